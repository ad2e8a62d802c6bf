use std::error::Error;

use async_trait::async_trait;

use crate::task::{NewTask, Task, TaskId, TaskPatch};

/// The remote task service, as the store controller sees it.
///
/// The store only ever talks to the service through this trait, so the same
/// control flow runs against the real REST service
/// ([`RestClient`](crate::client::RestClient)) and against an in-memory one in
/// tests (`MockTaskService`).
#[async_trait]
pub trait TaskSource {
    /// Retrieve every task the service knows about
    async fn fetch_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>>;

    /// Ask the service to create a task. The service picks the id.
    async fn create_task(&mut self, new_task: &NewTask) -> Result<(), Box<dyn Error>>;

    /// Replace task `id` with the fields of `patch`.
    /// Text fields the patch leaves out keep their current value on the service.
    async fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), Box<dyn Error>>;

    /// Ask the service to delete task `id`.
    /// Only transport failures are reported, the response status is not part of the delete contract.
    async fn delete_task(&mut self, id: TaskId) -> Result<(), Box<dyn Error>>;
}
