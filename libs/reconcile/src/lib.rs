//! Convergence primitives for driving asynchronous remote operations.
//!
//! Lifecycle calls against an orchestration service are fire-and-forget
//! triggers: the call returns once the work is accepted, and the actual
//! provisioning or teardown happens later on remote infrastructure.
//! Converging on the outcome means polling observable state and classifying
//! each observation:
//!
//! - **Reached**: the operation hit its goal state; stop with a result.
//! - **Pending**: still in flight; observe again after the interval.
//! - **Halted**: a terminal failure; stop immediately, never retry.
//!
//! # Invariants
//!
//! - Classification is pure and deterministic given the same observation.
//! - Halted outcomes are never retried; only Pending consumes budget.
//! - The budget bounds the waiting, not the remote operation itself.

use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

/// Default sleep between observations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Errors from a convergence attempt.
#[derive(Debug, Error)]
pub enum ConvergeError<E> {
    /// Budget exhausted while the operation was still in flight.
    #[error("timeout after {elapsed:?} waiting for {resource}")]
    Timeout {
        resource: String,
        elapsed: Duration,
    },

    /// The operation hit a terminal failure.
    #[error(transparent)]
    Halted(E),
}

/// Outcome of classifying a single observation of remote state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<T, E> {
    /// The goal state has been reached.
    Reached(T),

    /// The operation is still in flight.
    Pending,

    /// Terminal failure. Never retried.
    Halted(E),
}

impl<T, E> Progress<T, E> {
    /// Returns true if the goal state has been reached.
    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached(_))
    }

    /// Returns true if the operation is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Wall-clock budget for a convergence attempt.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start a deadline with the given budget.
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// Time elapsed since the deadline started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the budget is exhausted.
    pub fn expired(&self) -> bool {
        self.elapsed() >= self.budget
    }
}

/// Polling cadence and budget for one operation.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Sleep between observations.
    pub interval: Duration,

    /// Overall wall-clock budget.
    pub budget: Duration,
}

/// Drive `poll` until it reports a terminal outcome or the budget expires.
///
/// `poll` runs immediately, then once per interval. A Halted classification
/// aborts without waiting out the remaining budget. `resource` names what
/// is being converged, for logs and the timeout error.
pub async fn converge<T, E, F, Fut>(
    resource: &str,
    config: PollConfig,
    mut poll: F,
) -> Result<T, ConvergeError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Progress<T, E>>,
{
    let deadline = Deadline::new(config.budget);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match poll().await {
            Progress::Reached(value) => {
                debug!(resource, attempts, "convergence reached");
                return Ok(value);
            }
            Progress::Halted(err) => return Err(ConvergeError::Halted(err)),
            Progress::Pending => {}
        }

        if deadline.expired() {
            warn!(resource, attempts, "convergence budget exhausted");
            return Err(ConvergeError::Timeout {
                resource: resource.to_string(),
                elapsed: deadline.elapsed(),
            });
        }

        debug!(resource, attempts, "still in flight, polling again");
        tokio::time::sleep(config.interval).await;
    }
}
