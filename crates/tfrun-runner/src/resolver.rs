//! Workspace name resolution.

use std::sync::Arc;

use tracing::debug;

use tfrun_client::RemoteApi;
use tfrun_core::{WorkspaceId, WorkspaceRef};

use crate::error::RunnerError;

/// Turns an organization/workspace name pair into the platform's workspace id.
pub struct WorkspaceResolver {
    api: Arc<dyn RemoteApi>,
}

impl WorkspaceResolver {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self { api }
    }

    /// Resolve the workspace. Failures are not retried.
    pub async fn resolve(&self, workspace: &WorkspaceRef) -> Result<WorkspaceId, RunnerError> {
        debug!(workspace = %workspace, "Resolving workspace");

        let workspace_id = self
            .api
            .read_workspace_id(workspace)
            .await
            .map_err(|source| RunnerError::Resolution {
                workspace: workspace.clone(),
                source,
            })?;

        debug!(workspace = %workspace, workspace_id = %workspace_id, "Workspace resolved");
        Ok(workspace_id)
    }
}
