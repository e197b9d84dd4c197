//! tfrun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Runtime specifics
//!
//! All types here describe a single remote provisioning run: the workspace it
//! targets, the request that starts it, the statuses it moves through and the
//! outputs it leaves behind.

pub mod error;
pub mod ids;
pub mod output;
pub mod poll;
pub mod run;
pub mod status;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::{RunId, WorkspaceId};
pub use output::{Output, OutputSet};
pub use poll::{PollPolicy, DEFAULT_OUTPUTS_POLL_INTERVAL, DEFAULT_RUN_POLL_INTERVAL};
pub use run::{RunKind, RunOptions, RunRequest, WorkspaceRef};
pub use status::{RunPhase, RunStatus};
