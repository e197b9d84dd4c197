//! Run lifecycle orchestration.
//!
//! Resolves a workspace, submits a run, waits for it to reach a terminal
//! status, waits for the resulting state snapshot to be processed and turns
//! its outputs into string values a CI step can consume.

pub mod error;
pub mod lifecycle;
pub mod orchestrator;
pub mod poll;
pub mod readiness;
pub mod resolver;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use error::RunnerError;
pub use lifecycle::RunLifecycleController;
pub use orchestrator::{ActionPlan, ActionResult, OrchestratorConfig, RunOrchestrator};
pub use readiness::OutputReadinessWaiter;
pub use resolver::WorkspaceResolver;
pub use transform::{CallerOutput, CallerOutputs, OutputTransformer};

/// Re-exported so callers can cancel waits without depending on tokio-util.
pub use tokio_util::sync::CancellationToken;
