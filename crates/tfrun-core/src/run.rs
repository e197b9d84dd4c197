//! Workspace references and run requests.

use serde::{Deserialize, Serialize};

use crate::{CoreError, WorkspaceId};

/// Organization and workspace name as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WorkspaceRef {
    organization: String,
    name: String,
}

impl WorkspaceRef {
    /// Create a new WorkspaceRef. Both parts must be non-empty.
    pub fn new(organization: impl Into<String>, name: impl Into<String>) -> Result<Self, CoreError> {
        let organization = organization.into();
        let name = name.into();

        if organization.trim().is_empty() {
            return Err(CoreError::InvalidInput("organization must not be empty".into()));
        }
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput("workspace name must not be empty".into()));
        }

        Ok(Self { organization, name })
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for WorkspaceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.organization, self.name)
    }
}

/// Whether a run applies the configuration or tears it down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    #[default]
    Apply,
    Destroy,
}

/// Caller-supplied settings for a run, before a workspace is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Message shown on the run in the platform UI.
    pub message: String,

    /// Apply automatically once the plan succeeds.
    pub auto_apply: bool,

    /// Plan a destroy instead of an apply.
    pub is_destroy: bool,

    /// Resource addresses to force-replace.
    pub replace_addrs: Option<Vec<String>>,

    /// Resource addresses to scope the run to.
    pub target_addrs: Option<Vec<String>>,
}

impl RunOptions {
    /// Create options for an auto-applied, non-destroy run.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            auto_apply: true,
            is_destroy: false,
            replace_addrs: None,
            target_addrs: None,
        }
    }

    /// Builder method to set auto-apply.
    pub fn with_auto_apply(mut self, auto_apply: bool) -> Self {
        self.auto_apply = auto_apply;
        self
    }

    /// Builder method to request a destroy run.
    pub fn with_destroy(mut self, is_destroy: bool) -> Self {
        self.is_destroy = is_destroy;
        self
    }

    /// Builder method to set replace addresses. An empty list means "none".
    pub fn with_replace_addrs(mut self, addrs: Vec<String>) -> Self {
        self.replace_addrs = non_empty(addrs);
        self
    }

    /// Builder method to set target addresses. An empty list means "none".
    pub fn with_target_addrs(mut self, addrs: Vec<String>) -> Self {
        self.target_addrs = non_empty(addrs);
        self
    }

    /// The kind of run these options describe.
    pub fn kind(&self) -> RunKind {
        if self.is_destroy {
            RunKind::Destroy
        } else {
            RunKind::Apply
        }
    }

    /// Turn these options into a destroy request.
    ///
    /// Replace addresses are dropped: nothing is replaced when everything is
    /// being torn down.
    pub fn into_destroy(mut self) -> Self {
        self.is_destroy = true;
        self.replace_addrs = None;
        self
    }

    /// Attach a resolved workspace, producing a submittable request.
    pub fn for_workspace(&self, workspace_id: WorkspaceId) -> Result<RunRequest, CoreError> {
        if workspace_id.is_empty() {
            return Err(CoreError::InvalidInput(
                "run request requires a workspace id".into(),
            ));
        }

        Ok(RunRequest {
            options: self.clone(),
            workspace_id,
        })
    }
}

fn non_empty(addrs: Vec<String>) -> Option<Vec<String>> {
    let addrs: Vec<String> = addrs
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    if addrs.is_empty() {
        None
    } else {
        Some(addrs)
    }
}

/// A run request bound to a workspace. Only constructible through
/// [`RunOptions::for_workspace`], so the workspace id is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    options: RunOptions,
    workspace_id: WorkspaceId,
}

impl RunRequest {
    pub fn message(&self) -> &str {
        &self.options.message
    }

    pub fn auto_apply(&self) -> bool {
        self.options.auto_apply
    }

    pub fn is_destroy(&self) -> bool {
        self.options.is_destroy
    }

    pub fn replace_addrs(&self) -> Option<&[String]> {
        self.options.replace_addrs.as_deref()
    }

    pub fn target_addrs(&self) -> Option<&[String]> {
        self.options.target_addrs.as_deref()
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn kind(&self) -> RunKind {
        self.options.kind()
    }
}
