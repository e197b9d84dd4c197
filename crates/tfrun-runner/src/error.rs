//! Errors surfaced by the run orchestration.

use std::time::Duration;

use thiserror::Error;

use tfrun_client::ClientError;
use tfrun_core::{CoreError, RunId, RunStatus, WorkspaceId, WorkspaceRef};

/// Every failure carries the operation and identifier it relates to, so the
/// caller's log shows which phase failed.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Workspace lookup failed.
    #[error("failed to resolve workspace {workspace}: {source}")]
    Resolution {
        workspace: WorkspaceRef,
        #[source]
        source: ClientError,
    },

    /// The platform rejected the run.
    #[error("failed to create run on workspace {workspace_id}: {source}")]
    Submission {
        workspace_id: WorkspaceId,
        #[source]
        source: ClientError,
    },

    /// The run reached a failed terminal status.
    #[error("run {run_id} exited unexpectedly with status: {status}")]
    RunFailure { run_id: RunId, status: RunStatus },

    /// The workspace's current state snapshot has no outputs.
    #[error("current state version in workspace {workspace_id} has no available outputs")]
    OutputsUnavailable { workspace_id: WorkspaceId },

    /// A request made while waiting failed.
    #[error("failed to {operation} {id}: {source}")]
    Transport {
        operation: &'static str,
        id: String,
        #[source]
        source: ClientError,
    },

    /// A wait exceeded its deadline.
    #[error("timed out after {waited:?} waiting for {operation}")]
    Timeout { operation: String, waited: Duration },

    /// A wait was cancelled by the caller.
    #[error("cancelled while waiting for {operation}")]
    Cancelled { operation: String },

    /// Request values failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] CoreError),

    /// Outputs were requested for a destroy run.
    #[error("destroy runs leave no outputs to fetch")]
    DestroyHasNoOutputs,
}

impl RunnerError {
    /// Returns true for failures a wait loop may retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
