//! Waits for the platform to finish processing the latest state snapshot.
//!
//! An apply can finish before the platform has derived the resource and
//! output summary of the new state version. Reading outputs before the
//! `resources-processed` flag is set yields a stale or partial set.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use tfrun_client::RemoteApi;
use tfrun_core::{PollPolicy, WorkspaceId};

use crate::error::RunnerError;
use crate::poll::{poll_until, Poll};

pub struct OutputReadinessWaiter {
    api: Arc<dyn RemoteApi>,
}

impl OutputReadinessWaiter {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self { api }
    }

    /// Return once the current state version reports its resources processed.
    pub async fn await_ready(
        &self,
        workspace_id: &WorkspaceId,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<(), RunnerError> {
        let operation = format!("outputs of workspace {workspace_id} to be ready");

        poll_until(&operation, policy, cancel, || self.check(workspace_id)).await
    }

    async fn check(&self, workspace_id: &WorkspaceId) -> Result<Poll<()>, RunnerError> {
        let processed = self
            .api
            .read_resources_processed(workspace_id)
            .await
            .map_err(|source| RunnerError::Transport {
                operation: "read resources processed for workspace",
                id: workspace_id.to_string(),
                source,
            })?;

        if processed {
            Ok(Poll::Ready(()))
        } else {
            debug!(workspace_id = %workspace_id, "Waiting for workspace outputs to be ready, polling");
            Ok(Poll::Pending)
        }
    }
}
