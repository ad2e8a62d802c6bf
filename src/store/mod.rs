//! This module provides a [`TaskStore`], the owner of the local task list.
//!
//! The store is the only writer of that list. Every mutation is sent to the
//! service first, and the list is then replaced with a full refetch, so that
//! what the user sees is whatever the service acknowledged, not what the
//! client hoped for.
//!
//! Operations return a plain `bool` and absorb their errors: a failure is
//! logged, turned into a user-facing message (see [`TaskStore::error`]) and
//! reported on the feedback channel, but it never tears the client down.

pub mod feedback;

use chrono::Utc;

use crate::dates;
use crate::task::{NewTask, Task, TaskId, TaskPatch};
use crate::traits::TaskSource;
use feedback::{FeedbackSender, StoreEvent, Warning};

pub static FETCH_ERROR: &str = "Error fetching tasks. Please try again.";
pub static CREATE_ERROR: &str = "Error creating task. Please try again.";
pub static UPDATE_ERROR: &str = "Error updating task. Please try again.";
pub static TOGGLE_ERROR: &str = "Error toggling task completion. Please try again.";
pub static DELETE_ERROR: &str = "Error deleting task. Please try again.";

/// The authoritative local copy of the task list, and the operations that
/// change it.
///
/// `S` is the service this store mirrors. The real client uses
/// [`RestClient`](crate::client::RestClient), tests use a mocked service.
pub struct TaskStore<S: TaskSource> {
    source: S,
    tasks: Vec<Task>,
    error: Option<&'static str>,
    feedback_channel: Option<FeedbackSender>,
}

impl<S: TaskSource> TaskStore<S> {
    /// Create a store over `source`. The local list starts empty until
    /// [`fetch_all`](Self::fetch_all) populates it.
    pub fn new(source: S) -> Self {
        Self {
            source,
            tasks: Vec::new(),
            error: None,
            feedback_channel: None,
        }
    }

    /// Create a store that reports what it does on a feedback channel
    pub fn new_with_feedback(source: S, feedback: FeedbackSender) -> Self {
        Self {
            source,
            tasks: Vec::new(),
            error: None,
            feedback_channel: Some(feedback),
        }
    }

    /// The current local copy of the task list, in the order the service
    /// returned it. See [`crate::view`] for display ordering.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The user-facing message of the last failed operation, if any.
    ///
    /// A later failure replaces it, but a later success does not: the message
    /// stays up until [`clear_error`](Self::clear_error) dismisses it.
    pub fn error(&self) -> Option<&str> {
        self.error
    }

    /// Dismiss the current error message
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn source(&self) -> &S {
        &self.source
    }
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Replace the local list with what the service currently has.
    ///
    /// On failure the previous list is kept as-is.
    pub async fn fetch_all(&mut self) -> bool {
        log::debug!("Fetching the task list from the service...");
        match self.source.fetch_tasks().await {
            Ok(tasks) => {
                log::debug!("Fetched {} tasks", tasks.len());
                self.tasks = tasks;
                self.feedback(StoreEvent::Refreshed { tasks: self.tasks.len() });
                true
            }
            Err(err) => {
                log::error!("Error fetching tasks: {}", err);
                self.fail(FETCH_ERROR);
                false
            }
        }
    }

    /// Submit a draft to the service, then refetch.
    ///
    /// Drafts without a title, or with a deadline on a day that is already
    /// over, are rejected locally: nothing is sent, a [`Warning`] is emitted
    /// and this returns `false`.
    ///
    /// Returns whether the service accepted the task. The refetch that
    /// follows reports its own outcome through [`error`](Self::error).
    pub async fn create(&mut self, new_task: &NewTask) -> bool {
        if new_task.title.trim().is_empty() {
            self.warn(Warning::EmptyTitle);
            return false;
        }
        if let Some(due_date) = &new_task.due_date {
            if dates::is_before_today(due_date, &Utc::now()) {
                self.warn(Warning::DueDateInPast);
                return false;
            }
        }

        log::debug!("Creating task {:?}...", new_task.title);
        match self.source.create_task(new_task).await {
            Ok(()) => {
                self.fetch_all().await;
                true
            }
            Err(err) => {
                log::error!("Error creating task: {}", err);
                self.fail(CREATE_ERROR);
                false
            }
        }
    }

    /// Send a full-object update for task `id`, then refetch.
    ///
    /// When the patch marks the task completed, a [`StoreEvent::Completed`]
    /// is emitted as soon as the service accepts it, before the refetch, so
    /// that views can strike the task through immediately.
    pub async fn update(&mut self, id: TaskId, patch: &TaskPatch) -> bool {
        log::debug!("Updating task {}...", id);
        match self.source.update_task(id, patch).await {
            Ok(()) => {
                if patch.completed == Some(true) {
                    self.feedback(StoreEvent::Completed(id));
                }
                self.fetch_all().await;
                true
            }
            Err(err) => {
                log::error!("Error updating task: {}", err);
                self.fail(UPDATE_ERROR);
                false
            }
        }
    }

    /// Flip the completion of task `id` and send the result as a full-object
    /// update, then refetch.
    ///
    /// An id that is not in the local list is a silent no-op (the row the
    /// user acted on no longer exists, there is nothing to report).
    pub async fn toggle_completed(&mut self, id: TaskId) -> bool {
        let patch = match self.tasks.iter().find(|task| task.id() == id) {
            Some(task) => TaskPatch::toggling(task),
            None => {
                log::debug!("No task {} in the local list, nothing to toggle", id);
                return false;
            }
        };

        log::debug!("Toggling completion of task {}...", id);
        match self.source.update_task(id, &patch).await {
            Ok(()) => {
                self.fetch_all().await;
                true
            }
            Err(err) => {
                log::error!("Error toggling task completion: {}", err);
                self.fail(TOGGLE_ERROR);
                false
            }
        }
    }

    /// Ask the service to delete task `id`, then refetch.
    ///
    /// Deleting an id the service no longer has is not a failure, the refetch
    /// simply confirms it is gone.
    pub async fn delete(&mut self, id: TaskId) -> bool {
        log::debug!("Deleting task {}...", id);
        match self.source.delete_task(id).await {
            Ok(()) => {
                self.fetch_all().await;
                true
            }
            Err(err) => {
                log::error!("Error deleting task: {}", err);
                self.fail(DELETE_ERROR);
                false
            }
        }
    }

    fn warn(&self, warning: Warning) {
        log::warn!("{}", warning);
        self.feedback(StoreEvent::Warned(warning));
    }

    fn fail(&mut self, message: &'static str) {
        self.error = Some(message);
        self.feedback(StoreEvent::Failed { message });
    }

    /// Send an event as a feedback to the listener (if any).
    fn feedback(&self, event: StoreEvent) {
        self.feedback_channel
            .as_ref()
            .map(|sender| {
                sender.send(event)
            });
    }
}
