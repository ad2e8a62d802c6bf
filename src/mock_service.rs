//! This module mocks the remote task service with an in-memory one, so that
//! tests can exercise the store without a live server
#![cfg(any(test, feature = "local_tasklist_mocks_remote_service"))]

use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::task::{NewTask, Priority, Task, TaskId, TaskPatch};
use crate::traits::TaskSource;

/// This stores some behaviour tweaks, that describe how a mocked service will
/// behave during a given test
///
/// So that a function fails _n_ times after _m_ initial successes, set
/// `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub fetch_tasks_behaviour: (u32, u32),
    pub create_task_behaviour: (u32, u32),
    pub update_task_behaviour: (u32, u32),
    pub delete_task_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            fetch_tasks_behaviour: (0, n_fails),
            create_task_behaviour: (0, n_fails),
            update_task_behaviour: (0, n_fails),
            delete_task_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_fetch_tasks(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.fetch_tasks_behaviour, "fetch_tasks")
    }
    pub fn can_create_task(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_task_behaviour, "create_task")
    }
    pub fn can_update_task(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_task_behaviour, "update_task")
    }
    pub fn can_delete_task(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_task_behaviour, "delete_task")
    }
}

/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

/// How many calls of each kind a [`MockTaskService`] has received, scheduled
/// failures included.
///
/// Tests use this to assert that rejected drafts never reach the service.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch_tasks: u32,
    pub create_task: u32,
    pub update_task: u32,
    pub delete_task: u32,
}

/// A [`TaskSource`] that keeps its tasks in memory and behaves like the real
/// service does: ids are assigned sequentially, new tasks start uncompleted,
/// updates merge field by field and deletes never complain.
pub struct MockTaskService {
    tasks: Vec<Task>,
    next_id: i64,
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
    calls: Mutex<CallCounts>,
}

impl MockTaskService {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            mock_behaviour: None,
            calls: Mutex::new(CallCounts::default()),
        }
    }

    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    /// Seed a task, bypassing the behaviour tweaks and the call counters
    pub fn push_task(&mut self, title: &str, description: &str, due_date: Option<DateTime<Utc>>,
                     priority: Priority, completed: bool) -> TaskId {
        let id = self.assign_id();
        self.tasks.push(Task::new_with_parameters(
            id, title.to_string(), description.to_string(), due_date, priority, completed));
        id
    }

    /// What the service currently stores, in insertion order
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn call_counts(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    fn assign_id(&mut self) -> TaskId {
        let id = TaskId::from(self.next_id);
        self.next_id += 1;
        id
    }
}

#[async_trait]
impl TaskSource for MockTaskService {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        self.calls.lock().unwrap().fetch_tasks += 1;
        if let Some(behaviour) = &self.mock_behaviour {
            behaviour.lock().unwrap().can_fetch_tasks()?;
        }
        Ok(self.tasks.clone())
    }

    async fn create_task(&mut self, new_task: &NewTask) -> Result<(), Box<dyn Error>> {
        self.calls.lock().unwrap().create_task += 1;
        if let Some(behaviour) = &self.mock_behaviour {
            behaviour.lock().unwrap().can_create_task()?;
        }

        let id = self.assign_id();
        self.tasks.push(Task::new_with_parameters(
            id,
            new_task.title.clone(),
            new_task.description.clone(),
            new_task.due_date,
            new_task.priority,
            false,
        ));
        Ok(())
    }

    async fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), Box<dyn Error>> {
        self.calls.lock().unwrap().update_task += 1;
        if let Some(behaviour) = &self.mock_behaviour {
            behaviour.lock().unwrap().can_update_task()?;
        }

        match self.tasks.iter_mut().find(|task| task.id() == id) {
            Some(task) => {
                task.mock_remote_service_apply(patch);
                Ok(())
            }
            None => Err(format!("No task {} on the mocked service", id).into()),
        }
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<(), Box<dyn Error>> {
        self.calls.lock().unwrap().delete_task += 1;
        if let Some(behaviour) = &self.mock_behaviour {
            behaviour.lock().unwrap().can_delete_task()?;
        }

        // Like the real service contract: deleting a missing id is not an error
        self.tasks.retain(|task| task.id() != id);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_fetch_tasks().is_ok());
        assert!(ok.can_fetch_tasks().is_ok());
        assert!(ok.can_fetch_tasks().is_ok());
        assert!(ok.can_create_task().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_fetch_tasks().is_err());
        assert!(now.can_create_task().is_err());
        assert!(now.can_create_task().is_err());
        assert!(now.can_fetch_tasks().is_err());
        assert!(now.can_fetch_tasks().is_ok());
        assert!(now.can_create_task().is_ok());

        let mut custom = MockBehaviour {
            fetch_tasks_behaviour: (0, 1),
            update_task_behaviour: (1, 2),
            ..MockBehaviour::default()
        };
        assert!(custom.can_fetch_tasks().is_err());
        assert!(custom.can_fetch_tasks().is_ok());
        assert!(custom.can_update_task().is_ok());
        assert!(custom.can_update_task().is_err());
        assert!(custom.can_update_task().is_err());
        assert!(custom.can_update_task().is_ok());

        custom.suspend();
        assert!(custom.can_fetch_tasks().is_ok());
        custom.resume();
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let mut service = MockTaskService::new();
        let new_task = NewTask {
            title: "One".to_string(),
            description: String::new(),
            due_date: None,
            priority: Priority::Low,
        };
        service.create_task(&new_task).await.unwrap();
        service.create_task(&new_task).await.unwrap();

        let tasks = service.fetch_tasks().await.unwrap();
        assert_eq!(tasks[0].id(), TaskId::from(1));
        assert_eq!(tasks[1].id(), TaskId::from(2));
        assert_eq!(tasks[0].completed(), false);

        let counts = service.call_counts();
        assert_eq!(counts.create_task, 2);
        assert_eq!(counts.fetch_tasks, 1);
    }

    #[tokio::test]
    async fn updates_merge_and_misses_fail() {
        let mut service = MockTaskService::new();
        let id = service.push_task("Original", "details", None, Priority::High, false);

        let patch = TaskPatch {
            title: Some("Renamed".to_string()),
            description: None,
            due_date: None,
            completed: Some(true),
            priority: Priority::High,
        };
        service.update_task(id, &patch).await.unwrap();

        let task = &service.tasks()[0];
        assert_eq!(task.title(), "Renamed");
        assert_eq!(task.description(), "details");
        assert_eq!(task.completed(), true);

        assert!(service.update_task(TaskId::from(999), &patch).await.is_err());
    }

    #[tokio::test]
    async fn deletes_never_complain() {
        let mut service = MockTaskService::new();
        let id = service.push_task("Short-lived", "", None, Priority::Low, false);

        service.delete_task(TaskId::from(999)).await.unwrap();
        assert_eq!(service.tasks().len(), 1);

        service.delete_task(id).await.unwrap();
        assert_eq!(service.tasks().len(), 0);
    }
}
