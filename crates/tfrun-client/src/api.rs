//! The remote operations the run orchestration depends on.

use async_trait::async_trait;

use tfrun_core::{OutputSet, RunId, RunRequest, RunStatus, WorkspaceId, WorkspaceRef};

use crate::error::ClientError;

/// Remote run API.
///
/// Every method performs exactly one request and fails on any transport
/// error or non-2xx response. Implementations carry their own credentials
/// and timeouts.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// `POST runs`.
    async fn create_run(&self, request: &RunRequest) -> Result<RunId, ClientError>;

    /// `GET organizations/{org}/workspaces/{name}`.
    async fn read_workspace_id(&self, workspace: &WorkspaceRef)
        -> Result<WorkspaceId, ClientError>;

    /// `GET runs/{id}`.
    async fn read_run_status(&self, run_id: &RunId) -> Result<RunStatus, ClientError>;

    /// `GET workspaces/{id}/current-state-version`, returning the
    /// `resources-processed` flag.
    async fn read_resources_processed(&self, workspace_id: &WorkspaceId)
        -> Result<bool, ClientError>;

    /// `GET workspaces/{id}/current-state-version?include=outputs`.
    async fn read_state_version_outputs(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<OutputSet, ClientError>;
}
