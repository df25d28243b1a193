//! Render job operations: submission and polling.

use super::CloudClient;
use super::engine::{OperationRequest, Outcome};
use crate::error::Result;
use crate::types::{JobId, Operation};
use std::time::Duration;

impl CloudClient {
    /// Ask the service to start rendering `path`.
    ///
    /// Resolves to the job id to poll with; the job keeps running on the
    /// server regardless of what this client does next.
    pub async fn submit_job(&self, path: &str) -> Result<JobId> {
        let url = self.url_for(Operation::SubmitJob, &[("file", path)])?;
        match self
            .engine
            .run(OperationRequest::get(Operation::SubmitJob, url))
            .await?
        {
            Outcome::JobSubmitted(id) => Ok(id),
            _ => unreachable!("submit_job yields a JobSubmitted outcome"),
        }
    }

    /// Ask whether job `id` has finished; `false` means still rendering.
    pub async fn poll_job(&self, id: &JobId) -> Result<bool> {
        let url = self.url_for(Operation::PollJob, &[("id", id.as_str())])?;
        match self
            .engine
            .run(OperationRequest::get(Operation::PollJob, url))
            .await?
        {
            Outcome::JobStatus(done) => Ok(done),
            _ => unreachable!("poll_job yields a JobStatus outcome"),
        }
    }

    /// Poll job `id` every `interval` until the service reports it done.
    ///
    /// Each poll is an ordinary engine operation, so the wait respects the
    /// single-flight rule; a poll that is in flight can be interrupted with
    /// [`CloudClient::cancel`].
    pub async fn wait_job(&self, id: &JobId, interval: Duration) -> Result<()> {
        while !self.poll_job(id).await? {
            tokio::time::sleep(interval).await;
        }
        Ok(())
    }
}
