//! Run submission and completion tracking.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use tfrun_client::RemoteApi;
use tfrun_core::{PollPolicy, RunId, RunPhase, RunRequest, RunStatus};

use crate::error::RunnerError;
use crate::poll::{poll_until, Poll};

/// Creates runs and follows them to a terminal status.
///
/// The controller only knows the terminal statuses. Everything else the
/// platform reports (queueing, planning, cost estimation, policy checks,
/// applying, and statuses added later) keeps the wait going.
pub struct RunLifecycleController {
    api: Arc<dyn RemoteApi>,
}

impl RunLifecycleController {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self { api }
    }

    /// Submit a run.
    pub async fn create(&self, request: &RunRequest) -> Result<RunId, RunnerError> {
        info!(
            workspace_id = %request.workspace_id(),
            auto_apply = request.auto_apply(),
            is_destroy = request.is_destroy(),
            "Creating run"
        );

        let run_id = self
            .api
            .create_run(request)
            .await
            .map_err(|source| RunnerError::Submission {
                workspace_id: request.workspace_id().clone(),
                source,
            })?;

        info!(run_id = %run_id, "Run created");
        Ok(run_id)
    }

    /// Poll the run until it succeeds or fails.
    ///
    /// Returns the successful terminal status. A failed terminal status is
    /// returned as [`RunnerError::RunFailure`]; the run stays inspectable on
    /// the platform.
    pub async fn await_completion(
        &self,
        run_id: &RunId,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<RunStatus, RunnerError> {
        let operation = format!("run {run_id} to complete");

        let status = poll_until(&operation, policy, cancel, || self.check(run_id)).await?;

        info!(run_id = %run_id, status = %status, "Run completed");
        Ok(status)
    }

    async fn check(&self, run_id: &RunId) -> Result<Poll<RunStatus>, RunnerError> {
        let status = self
            .api
            .read_run_status(run_id)
            .await
            .map_err(|source| RunnerError::Transport {
                operation: "read run status",
                id: run_id.to_string(),
                source,
            })?;

        match status.phase() {
            RunPhase::Succeeded => Ok(Poll::Ready(status)),
            RunPhase::Failed => Err(RunnerError::RunFailure {
                run_id: run_id.clone(),
                status,
            }),
            RunPhase::InProgress => {
                debug!(run_id = %run_id, status = %status, "Waiting for run to complete, polling");
                Ok(Poll::Pending)
            }
        }
    }
}
