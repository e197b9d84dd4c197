//! Composition root: resolve, submit, wait, and collect outputs.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use tfrun_client::RemoteApi;
use tfrun_core::{
    PollPolicy, RunId, RunKind, RunOptions, WorkspaceRef, DEFAULT_OUTPUTS_POLL_INTERVAL,
    DEFAULT_RUN_POLL_INTERVAL,
};

use crate::error::RunnerError;
use crate::lifecycle::RunLifecycleController;
use crate::readiness::OutputReadinessWaiter;
use crate::resolver::WorkspaceResolver;
use crate::transform::{CallerOutputs, OutputTransformer};

/// What to run and how to wait for it.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Target workspace.
    pub workspace: WorkspaceRef,

    /// Settings for runs created by [`RunOrchestrator::build`].
    pub run_options: RunOptions,

    /// Pacing of run status polls.
    pub run_poll: PollPolicy,

    /// Pacing of state-version readiness polls.
    pub outputs_poll: PollPolicy,
}

impl OrchestratorConfig {
    pub fn new(workspace: WorkspaceRef, run_options: RunOptions) -> Self {
        Self {
            workspace,
            run_options,
            run_poll: PollPolicy::fixed(DEFAULT_RUN_POLL_INTERVAL),
            outputs_poll: PollPolicy::fixed(DEFAULT_OUTPUTS_POLL_INTERVAL),
        }
    }

    /// Builder method to set the run polling policy.
    pub fn with_run_poll(mut self, policy: PollPolicy) -> Self {
        self.run_poll = policy;
        self
    }

    /// Builder method to set the readiness polling policy.
    pub fn with_outputs_poll(mut self, policy: PollPolicy) -> Self {
        self.outputs_poll = policy;
        self
    }
}

/// Which steps of the full action to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPlan {
    /// Wait for the created run to reach a terminal status.
    pub wait_for_run: bool,

    /// Do not create a run; only read outputs.
    pub skip_run: bool,
}

impl Default for ActionPlan {
    fn default() -> Self {
        Self {
            wait_for_run: true,
            skip_run: false,
        }
    }
}

/// Everything the action reports back to its caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionResult {
    /// Created run, absent when run creation was skipped.
    pub run_id: Option<RunId>,

    /// Workspace outputs, absent for destroy runs.
    pub outputs: Option<CallerOutputs>,
}

/// Drives one run per call through its lifecycle.
pub struct RunOrchestrator {
    api: Arc<dyn RemoteApi>,
    config: OrchestratorConfig,
    resolver: WorkspaceResolver,
    lifecycle: RunLifecycleController,
    readiness: OutputReadinessWaiter,
    transformer: OutputTransformer,
    cancel: CancellationToken,
}

impl RunOrchestrator {
    pub fn new(api: Arc<dyn RemoteApi>, config: OrchestratorConfig) -> Self {
        Self {
            resolver: WorkspaceResolver::new(api.clone()),
            lifecycle: RunLifecycleController::new(api.clone()),
            readiness: OutputReadinessWaiter::new(api.clone()),
            transformer: OutputTransformer::new(),
            cancel: CancellationToken::new(),
            api,
            config,
        }
    }

    /// Builder method to replace the output transformation rules.
    pub fn with_transformer(mut self, transformer: OutputTransformer) -> Self {
        self.transformer = transformer;
        self
    }

    /// Builder method to stop every wait when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Create a run from the configured options, optionally waiting for it
    /// to succeed. Without waiting the run is still in progress on return.
    pub async fn build(&self, wait_for_completion: bool) -> Result<RunId, RunnerError> {
        self.submit(&self.config.run_options, wait_for_completion)
            .await
    }

    /// Create a destroy run for the workspace, optionally waiting for it.
    pub async fn destroy(&self, wait_for_completion: bool) -> Result<RunId, RunnerError> {
        let options = self.config.run_options.clone().into_destroy();
        self.submit(&options, wait_for_completion).await
    }

    /// Read the outputs of the workspace's current state version.
    ///
    /// `kind` is the kind of the run that produced the state. Destroy runs
    /// leave nothing meaningful behind and are rejected up front.
    pub async fn fetch_outputs(&self, kind: RunKind) -> Result<CallerOutputs, RunnerError> {
        if kind == RunKind::Destroy {
            return Err(RunnerError::DestroyHasNoOutputs);
        }

        let workspace_id = self.resolver.resolve(&self.config.workspace).await?;

        info!(workspace_id = %workspace_id, "Fetching outputs from workspace");
        self.readiness
            .await_ready(&workspace_id, &self.config.outputs_poll, &self.cancel)
            .await?;

        let outputs = self
            .api
            .read_state_version_outputs(&workspace_id)
            .await
            .map_err(|source| RunnerError::Transport {
                operation: "read latest state version outputs in workspace",
                id: workspace_id.to_string(),
                source,
            })?;

        self.transformer.transform(&workspace_id, outputs)
    }

    /// Run the whole action: create the run unless skipped, then collect
    /// outputs unless the configured run is a destroy.
    pub async fn execute(&self, plan: ActionPlan) -> Result<ActionResult, RunnerError> {
        let mut result = ActionResult::default();

        if !plan.skip_run {
            info!(workspace = %self.config.workspace, "Creating run in workspace");
            let run_id = self.build(plan.wait_for_run).await?;
            if plan.wait_for_run {
                info!(run_id = %run_id, "Run has been created and completed successfully");
            } else {
                info!(run_id = %run_id, "Run has been created but has not completed yet");
            }
            result.run_id = Some(run_id);
        }

        let kind = self.config.run_options.kind();
        if kind == RunKind::Apply {
            result.outputs = Some(self.fetch_outputs(kind).await?);
        }

        Ok(result)
    }

    async fn submit(
        &self,
        options: &RunOptions,
        wait_for_completion: bool,
    ) -> Result<RunId, RunnerError> {
        let workspace_id = self.resolver.resolve(&self.config.workspace).await?;
        let request = options.for_workspace(workspace_id)?;

        let run_id = self.lifecycle.create(&request).await?;

        if wait_for_completion {
            self.lifecycle
                .await_completion(&run_id, &self.config.run_poll, &self.cancel)
                .await?;
        }

        Ok(run_id)
    }
}
