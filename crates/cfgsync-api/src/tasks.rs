// Task endpoints
//
// Listing and executing change-control tasks created by a topology save.

use serde_json::json;
use tracing::debug;

use crate::client::CvpClient;
use crate::error::Error;
use crate::models::TaskPage;

impl CvpClient {
    /// List tasks with the given status (`Pending`, `Completed`, ...).
    ///
    /// `GET /cvpservice/task/getTasks.do?queryparam={status}&startIndex=0&endIndex=0`
    pub async fn list_tasks(&self, status: &str) -> Result<TaskPage, Error> {
        let url = self.url(
            "/cvpservice/task/getTasks.do",
            &[("queryparam", status), ("startIndex", "0"), ("endIndex", "0")],
        )?;
        debug!(status, "listing tasks");
        self.get(url, "Checking for existing tasks").await
    }

    /// Execute tasks by work order id.
    ///
    /// `POST /cvpservice/task/executeTask.do`
    pub async fn execute_tasks(&self, task_ids: &[String]) -> Result<(), Error> {
        let url = self.url("/cvpservice/task/executeTask.do", &[])?;
        debug!(?task_ids, "executing tasks");
        let body = json!({ "data": task_ids });
        let _: serde_json::Value = self.post(url, &body, "Executing tasks").await?;
        Ok(())
    }
}
