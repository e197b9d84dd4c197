//! Run status as reported by the remote platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw status string of a run.
///
/// The platform defines many intermediate statuses (`pending`, `planning`,
/// `cost_estimating`, `policy_checking`, `applying`, ...) and adds new ones
/// over time, so the status is kept as an open string. Only the terminal
/// statuses are named here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunStatus(String);

impl RunStatus {
    pub const APPLIED: &'static str = "applied";
    pub const PLANNED_AND_FINISHED: &'static str = "planned_and_finished";
    pub const CANCELED: &'static str = "canceled";
    pub const ERRORED: &'static str = "errored";
    pub const DISCARDED: &'static str = "discarded";

    /// Create a new RunStatus from a string.
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the status into one of the three lifecycle partitions.
    pub fn phase(&self) -> RunPhase {
        match self.0.as_str() {
            Self::APPLIED | Self::PLANNED_AND_FINISHED => RunPhase::Succeeded,
            Self::CANCELED | Self::ERRORED | Self::DISCARDED => RunPhase::Failed,
            _ => RunPhase::InProgress,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RunStatus {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle partition of a [`RunStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Anything not known to be terminal.
    InProgress,
    /// The run finished and its result can be consumed.
    Succeeded,
    /// The run stopped without producing a usable result.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses() {
        for s in ["applied", "planned_and_finished"] {
            assert_eq!(RunStatus::from(s).phase(), RunPhase::Succeeded, "{s}");
        }
    }

    #[test]
    fn test_failure_statuses() {
        for s in ["canceled", "errored", "discarded"] {
            assert_eq!(RunStatus::from(s).phase(), RunPhase::Failed, "{s}");
        }
    }

    #[test]
    fn test_unknown_statuses_are_in_progress() {
        for s in [
            "pending",
            "planning",
            "applying",
            "cost_estimating",
            "policy_checking",
            "some_future_status",
            "",
            "APPLIED",
        ] {
            assert_eq!(RunStatus::from(s).phase(), RunPhase::InProgress, "{s}");
        }
    }
}
