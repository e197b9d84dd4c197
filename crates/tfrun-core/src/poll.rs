//! Polling policy shared by the run and output-readiness waits.

use std::time::Duration;

/// Default interval between run status polls.
pub const DEFAULT_RUN_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default interval between state-version readiness polls.
pub const DEFAULT_OUTPUTS_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How a wait loop paces itself and when it gives up.
///
/// The default is a fixed interval with no deadline and no tolerance for
/// transport errors: the loop ends only on a terminal remote condition,
/// the first failed request, or cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before the second poll.
    pub interval: Duration,

    /// Upper bound for the delay once backoff kicks in.
    pub max_interval: Duration,

    /// Multiplier applied to the delay after every unsuccessful poll.
    pub backoff_factor: u32,

    /// Total time after which the wait fails with a timeout.
    pub deadline: Option<Duration>,

    /// Consecutive failed requests tolerated before the wait fails.
    pub max_consecutive_errors: u32,
}

impl PollPolicy {
    /// Fixed-interval policy.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_interval: interval,
            backoff_factor: 1,
            deadline: None,
            max_consecutive_errors: 0,
        }
    }

    /// Builder method to grow the interval geometrically up to `max_interval`.
    pub fn with_backoff(mut self, max_interval: Duration, factor: u32) -> Self {
        self.max_interval = max_interval.max(self.interval);
        self.backoff_factor = factor.max(1);
        self
    }

    /// Builder method to set an overall deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder method to tolerate transient request failures.
    pub fn with_error_tolerance(mut self, max_consecutive_errors: u32) -> Self {
        self.max_consecutive_errors = max_consecutive_errors;
        self
    }

    /// Calculate the next delay from the current one.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let next = current.saturating_mul(self.backoff_factor);
        if next > self.max_interval {
            self.max_interval
        } else {
            next
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_RUN_POLL_INTERVAL)
    }
}
