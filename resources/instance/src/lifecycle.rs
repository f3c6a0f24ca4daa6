//! The create/delete convergence state machine.
//!
//! Create and delete are asynchronous on the service side, so both
//! operations share one shape: issue the trigger, then poll the instance
//! record until it reaches the goal terminal state. Each observation is
//! classified by a pure function, keeping the machine testable without a
//! client or a clock.

use strato_client::{state, ApiClient, ApiError, Instance};
use strato_reconcile::{converge, ConvergeError, PollConfig, Progress};
use tracing::info;

use crate::error::InstanceError;

/// Terminal state a lifecycle operation converges toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleGoal {
    Created,
    Deleted,
}

impl LifecycleGoal {
    fn target_state(self) -> &'static str {
        match self {
            LifecycleGoal::Created => state::CREATED,
            LifecycleGoal::Deleted => state::DELETED,
        }
    }

    fn op(self) -> &'static str {
        match self {
            LifecycleGoal::Created => "creating instance",
            LifecycleGoal::Deleted => "deleting instance",
        }
    }
}

/// Classify one observation of remote state against the goal.
///
/// "Not found" is contextual: an instance that is gone counts as deleted,
/// while an instance that vanishes mid-creation is a hard failure. The
/// "error" state is terminal and never retried; every unrecognized state
/// is transient.
pub(crate) fn classify(
    goal: LifecycleGoal,
    id: &str,
    fetched: Result<Instance, ApiError>,
) -> Progress<Option<Instance>, InstanceError> {
    match fetched {
        Err(err) if err.is_not_found() => match goal {
            LifecycleGoal::Deleted => Progress::Reached(None),
            LifecycleGoal::Created => Progress::Halted(InstanceError::Vanished {
                id: id.to_string(),
            }),
        },
        Err(err) => Progress::Halted(InstanceError::remote("fetching instance", id, err)),
        Ok(instance) if instance.state == state::ERROR => {
            Progress::Halted(InstanceError::ErrorState { id: id.to_string() })
        }
        Ok(instance) if instance.state == goal.target_state() => match goal {
            LifecycleGoal::Created => Progress::Reached(Some(instance)),
            LifecycleGoal::Deleted => Progress::Reached(None),
        },
        Ok(_) => Progress::Pending,
    }
}

/// Poll the instance until it reaches the goal state.
///
/// Resolves to the final record for `Created`. `Deleted` resolves to
/// `None`, including when the record is gone entirely.
pub(crate) async fn await_goal(
    client: &ApiClient,
    id: &str,
    goal: LifecycleGoal,
    config: PollConfig,
) -> Result<Option<Instance>, InstanceError> {
    let outcome = converge(id, config, || async move {
        classify(goal, id, client.get_instance(id).await)
    })
    .await;

    match outcome {
        Ok(instance) => {
            info!(id, state = goal.target_state(), "instance reached goal state");
            Ok(instance)
        }
        Err(ConvergeError::Halted(err)) => Err(err),
        Err(ConvergeError::Timeout { elapsed, .. }) => Err(InstanceError::Timeout {
            op: goal.op(),
            id: id.to_string(),
            elapsed,
        }),
    }
}
