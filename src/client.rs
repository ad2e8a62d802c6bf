//! This module provides a client to connect to a REST task service

use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::task::{NewTask, Task, TaskId, TaskPatch};
use crate::traits::TaskSource;

/// How long a single request may take before it is abandoned. A service that
/// stops answering becomes a per-operation failure instead of keeping its
/// caller waiting.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A task source that fetches its data from a REST service over HTTP.
///
/// The service is expected to serve the task collection at `tasks` under the
/// base URL, and individual tasks at `tasks/<id>`.
pub struct RestClient {
    url: Url,
    http: reqwest::Client,
    timeout: Duration,
}

impl RestClient {
    /// Create a client. This does not contact the service.
    ///
    /// If the base URL has a path, it must end with a `/`, otherwise the last
    /// segment would be replaced when endpoints are joined onto it.
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, Box<dyn Error>> {
        let url = Url::parse(url.as_ref())?;
        Ok(Self::from_url(url))
    }

    /// Create a client from an already-parsed base URL
    pub fn from_url(url: Url) -> Self {
        Self::with_timeout(url, REQUEST_TIMEOUT)
    }

    /// Create a client whose requests are abandoned after `timeout` instead
    /// of the default [`REQUEST_TIMEOUT`]
    pub fn with_timeout(url: Url, timeout: Duration) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn url(&self) -> &Url { &self.url }

    fn tasks_url(&self) -> Result<Url, Box<dyn Error>> {
        Ok(self.url.join("tasks")?)
    }

    fn task_url(&self, id: TaskId) -> Result<Url, Box<dyn Error>> {
        Ok(self.url.join(&format!("tasks/{}", id))?)
    }
}

#[async_trait]
impl TaskSource for RestClient {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let url = self.tasks_url()?;
        let response = self.http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }

        let tasks: Vec<Task> = response.json().await?;
        log::debug!("Fetched {} tasks from {}", tasks.len(), self.url);
        Ok(tasks)
    }

    async fn create_task(&mut self, new_task: &NewTask) -> Result<(), Box<dyn Error>> {
        let url = self.tasks_url()?;
        log::debug!("Creating task {:?} on {}", new_task.title, url);
        let response = self.http
            .post(url)
            .timeout(self.timeout)
            .json(new_task)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }
        Ok(())
    }

    async fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), Box<dyn Error>> {
        let url = self.task_url(id)?;
        log::debug!("Updating task {} on {}", id, url);
        let response = self.http
            .put(url)
            .timeout(self.timeout)
            .json(patch)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }
        Ok(())
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<(), Box<dyn Error>> {
        let url = self.task_url(id)?;
        log::debug!("Deleting task {} on {}", id, url);
        // Transport failures surface here, but the response status is not
        // checked, deleting an id the service no longer has is not an error.
        self.http
            .delete(url)
            .timeout(self.timeout)
            .send()
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn endpoints_are_joined_onto_the_base_url() {
        let client = RestClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.tasks_url().unwrap().as_str(), "http://localhost:5000/tasks");
        assert_eq!(client.task_url(TaskId::from(12)).unwrap().as_str(), "http://localhost:5000/tasks/12");

        // A base URL with a path keeps it as long as it ends with a slash
        let client = RestClient::new("https://example.org/api/v2/").unwrap();
        assert_eq!(client.tasks_url().unwrap().as_str(), "https://example.org/api/v2/tasks");
    }

    #[test]
    fn rejects_an_invalid_base_url() {
        assert!(RestClient::new("not a url at all").is_err());
    }

    #[tokio::test]
    async fn a_hung_service_fails_the_request_instead_of_waiting() {
        let _ = env_logger::builder().is_test(true).try_init();

        // A listener that accepts the connection but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let connection = listener.accept();
            std::thread::sleep(Duration::from_secs(5));
            drop(connection);
        });

        let url = Url::parse(&format!("http://{}/", address)).unwrap();
        let client = RestClient::with_timeout(url, Duration::from_millis(200));
        assert!(client.fetch_tasks().await.is_err());
    }
}
