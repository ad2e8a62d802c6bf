//! Tasks, as the remote REST service stores and returns them

use std::fmt::{Display, Error, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The identifier the service assigns to a task when it is created.
///
/// Clients never pick these: they learn them from `GET /tasks` responses and
/// hand them back in the URLs of update and delete requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}
impl From<i64> for TaskId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}

/// How urgent a task is.
///
/// The service stores free-form strings, but clients only ever distinguish two
/// ranks. Any string other than `"high"` (even a misspelt one) is treated as
/// low priority, so that a task with a mangled priority still shows up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    High,
    Low,
}

impl Priority {
    pub fn is_high(&self) -> bool {
        match self {
            Priority::High => true,
            Priority::Low => false,
        }
    }

    /// The string the service expects for this priority
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Low => "low",
        }
    }

    /// Parse a priority the service returned. Unknown values are logged and demoted to [`Priority::Low`]
    pub fn from_wire(raw: &str) -> Self {
        if raw == "high" {
            Priority::High
        } else {
            if raw != "low" {
                log::warn!("Unknown priority {:?}, treating it as a low priority", raw);
            }
            Priority::Low
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Low
    }
}

impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Priority::from_wire(&raw))
    }
}

/// Accept an explicit JSON `null` for a field that has a sensible default.
/// `#[serde(default)]` alone only covers keys that are missing entirely, and
/// the service stores these columns as nullable.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// A task, as returned by `GET /tasks`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The server-assigned identifier
    id: TaskId,
    /// The display name of the task
    title: String,
    /// Free-form details, possibly empty
    #[serde(default, deserialize_with = "nullable")]
    description: String,
    /// When this task is due. Tasks without a deadline never expire
    #[serde(default, with = "crate::dates::iso_serde", skip_serializing_if = "Option::is_none")]
    due_date: Option<DateTime<Utc>>,
    /// Whether this task has been checked off
    #[serde(default, deserialize_with = "nullable")]
    completed: bool,
    #[serde(default, deserialize_with = "nullable")]
    priority: Priority,
}

impl Task {
    /// Create a task record the way the service would return it
    pub fn new_with_parameters(id: TaskId, title: String, description: String,
                               due_date: Option<DateTime<Utc>>, priority: Priority, completed: bool) -> Self {
        Self { id, title, description, due_date, completed, priority }
    }

    pub fn id(&self) -> TaskId { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn due_date(&self) -> Option<&DateTime<Utc>> { self.due_date.as_ref() }
    pub fn completed(&self) -> bool { self.completed }
    pub fn priority(&self) -> Priority { self.priority }

    #[cfg(any(test, feature = "local_tasklist_mocks_remote_service"))]
    /// Overwrite this record the way the service merges a `PUT` body:
    /// text and completion fields it does not contain are kept, the deadline
    /// and the priority are always replaced.
    pub fn mock_remote_service_apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.due_date = patch.due_date;
        self.priority = patch.priority;
    }
}

/// The body of a `POST /tasks` request.
///
/// The service assigns the id and starts every task uncompleted, so neither
/// is part of the payload.
#[derive(Clone, Debug, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(with = "crate::dates::iso_serde", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

/// The body of a `PUT /tasks/<id>` request.
///
/// `None` text fields are left out of the payload and the service keeps its
/// current values for them. The deadline and the priority are always part of
/// the payload, since the service replaces those wholesale.
#[derive(Clone, Debug, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "crate::dates::iso_serde", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    pub priority: Priority,
}

impl TaskPatch {
    /// The full-object body that flips the completion of `task` and keeps
    /// everything else as-is
    pub fn toggling(task: &Task) -> Self {
        Self {
            title: Some(task.title().to_string()),
            description: Some(task.description().to_string()),
            due_date: task.due_date().copied(),
            completed: Some(!task.completed()),
            priority: task.priority(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn priority_from_the_wire() {
        assert_eq!(Priority::from_wire("high"), Priority::High);
        assert_eq!(Priority::from_wire("low"), Priority::Low);
        // Anything unknown is demoted rather than dropped
        assert_eq!(Priority::from_wire("URGENT"), Priority::Low);
        assert_eq!(Priority::from_wire(""), Priority::Low);
    }

    #[test]
    fn deserialize_a_service_response() {
        let body = r#"[
            {"id": 3, "title": "Buy milk", "description": "Semi-skimmed",
             "due_date": "2024-03-10T18:30:00", "completed": false, "priority": "high"},
            {"id": 4, "title": "Do nothing", "description": "", "due_date": null,
             "completed": true, "priority": "whatever"}
        ]"#;

        let tasks: Vec<Task> = serde_json::from_str(body).unwrap();
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].id(), TaskId::from(3));
        assert_eq!(tasks[0].title(), "Buy milk");
        assert_eq!(tasks[0].due_date(), Some(&Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap()));
        assert_eq!(tasks[0].priority(), Priority::High);
        assert_eq!(tasks[0].completed(), false);

        assert_eq!(tasks[1].due_date(), None);
        assert_eq!(tasks[1].completed(), true);
        // Unknown priorities do not fail the whole fetch
        assert_eq!(tasks[1].priority(), Priority::Low);
    }

    #[test]
    fn deserialize_tolerates_missing_fields() {
        let body = r#"{"id": 9, "title": "Bare minimum"}"#;
        let task: Task = serde_json::from_str(body).unwrap();
        assert_eq!(task.description(), "");
        assert_eq!(task.due_date(), None);
        assert_eq!(task.completed(), false);
        assert_eq!(task.priority(), Priority::Low);
    }

    #[test]
    fn deserialize_tolerates_null_fields() {
        // Nullable service columns come back as explicit nulls, not as
        // missing keys. One such row must not fail the whole fetch.
        let body = r#"[
            {"id": 1, "title": "Legacy row", "description": null,
             "due_date": null, "completed": null, "priority": null},
            {"id": 2, "title": "Complete row", "description": "set",
             "due_date": "2024-03-10T18:30:00", "completed": true, "priority": "high"}
        ]"#;

        let tasks: Vec<Task> = serde_json::from_str(body).unwrap();
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].description(), "");
        assert_eq!(tasks[0].due_date(), None);
        assert_eq!(tasks[0].completed(), false);
        assert_eq!(tasks[0].priority(), Priority::Low);

        assert_eq!(tasks[1].description(), "set");
        assert_eq!(tasks[1].completed(), true);
    }

    #[test]
    fn serialize_a_creation_payload() {
        let new_task = NewTask {
            title: "Call the plumber".to_string(),
            description: "About the kitchen sink".to_string(),
            due_date: Some(Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap()),
            priority: Priority::High,
        };

        let body = serde_json::to_value(&new_task).unwrap();
        assert_eq!(body, serde_json::json!({
            "title": "Call the plumber",
            "description": "About the kitchen sink",
            "due_date": "2024-03-10T18:30:00.000Z",
            "priority": "high",
        }));
    }

    #[test]
    fn creation_payload_without_a_deadline() {
        let new_task = NewTask {
            title: "Someday".to_string(),
            description: String::new(),
            due_date: None,
            priority: Priority::Low,
        };

        let body = serde_json::to_value(&new_task).unwrap();
        assert_eq!(body.get("due_date"), None);
        assert_eq!(body.get("completed"), None);
    }

    #[test]
    fn toggling_patch_flips_only_the_completion() {
        let task = Task::new_with_parameters(
            TaskId::from(7), "Water the plants".to_string(), "Not the cactus".to_string(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()), Priority::Low, false,
        );

        let patch = TaskPatch::toggling(&task);
        assert_eq!(patch.completed, Some(true));
        assert_eq!(patch.title.as_deref(), Some("Water the plants"));
        assert_eq!(patch.due_date, task.due_date().copied());
        assert_eq!(patch.priority, Priority::Low);

        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body.get("completed"), Some(&serde_json::json!(true)));
        assert_eq!(body.get("due_date"), Some(&serde_json::json!("2024-05-01T08:00:00.000Z")));
    }

    #[test]
    fn patches_merge_like_the_service_does() {
        let mut task = Task::new_with_parameters(
            TaskId::from(1), "Original".to_string(), "Details".to_string(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()), Priority::High, false,
        );

        let patch = TaskPatch {
            title: None,
            description: None,
            due_date: None,
            completed: Some(true),
            priority: Priority::High,
        };
        task.mock_remote_service_apply(&patch);

        assert_eq!(task.title(), "Original");
        assert_eq!(task.completed(), true);
        // Deadlines are replaced wholesale, so a patch without one clears it
        assert_eq!(task.due_date(), None);
    }
}
