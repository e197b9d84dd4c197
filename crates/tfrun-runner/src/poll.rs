//! Shared wait loop for conditions that eventually become true remotely.

use std::future::Future;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use tfrun_core::PollPolicy;

use crate::error::RunnerError;

/// Outcome of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll<T> {
    /// The condition holds; stop waiting.
    Ready(T),
    /// Not yet; poll again after the current interval.
    Pending,
}

/// Poll `attempt` until it returns [`Poll::Ready`] or a non-retryable error.
///
/// The interval grows per `policy`. Transient errors are tolerated up to
/// `policy.max_consecutive_errors` in a row. The wait ends with
/// [`RunnerError::Timeout`] once the deadline has passed and with
/// [`RunnerError::Cancelled`] as soon as `cancel` fires, even mid-request.
pub async fn poll_until<T, F, Fut>(
    operation: &str,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut attempt: F,
) -> Result<T, RunnerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Poll<T>, RunnerError>>,
{
    let started = Instant::now();
    let mut interval = policy.interval;
    let mut consecutive_errors = 0u32;
    let mut polls = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Err(cancelled(operation));
        }

        polls += 1;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(operation)),
            outcome = attempt() => outcome,
        };

        match outcome {
            Ok(Poll::Ready(value)) => {
                debug!(operation, polls, elapsed = ?started.elapsed(), "Wait finished");
                return Ok(value);
            }
            Ok(Poll::Pending) => {
                consecutive_errors = 0;
            }
            Err(e) if e.is_transient() && consecutive_errors < policy.max_consecutive_errors => {
                consecutive_errors += 1;
                warn!(
                    operation,
                    error = %e,
                    attempt = consecutive_errors,
                    max = policy.max_consecutive_errors,
                    "Poll failed, retrying"
                );
            }
            Err(e) => return Err(e),
        }

        let delay = match policy.deadline {
            Some(deadline) => {
                let elapsed = started.elapsed();
                if elapsed >= deadline {
                    return Err(RunnerError::Timeout {
                        operation: operation.to_string(),
                        waited: elapsed,
                    });
                }
                interval.min(deadline - elapsed)
            }
            None => interval,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(operation)),
            _ = sleep(delay) => {}
        }

        interval = policy.next_interval(interval);
    }
}

fn cancelled(operation: &str) -> RunnerError {
    RunnerError::Cancelled {
        operation: operation.to_string(),
    }
}
