//! Error taxonomy for instance resource operations.

use std::time::Duration;

use strato_client::ApiError;
use thiserror::Error;

/// Desired-state validation failures, surfaced before any remote call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("instances accept at most one video card")]
    TooManyVideoCards,

    #[error("not an IPv4 address: {0}")]
    InvalidIpv4(String),

    #[error("not a MAC address: {0}")]
    InvalidMac(String),
}

/// Errors from instance lifecycle operations.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// The desired state is malformed; nothing was sent to the service.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service acknowledged creation but returned a blank identifier.
    #[error("service returned a blank instance identifier")]
    BlankIdentifier,

    /// The instance entered the terminal "error" state.
    #[error("instance {id} in error state")]
    ErrorState { id: String },

    /// The instance does not exist.
    #[error("instance {id} not found")]
    NotFound { id: String },

    /// The instance disappeared while waiting for it to be created.
    #[error("instance {id} disappeared before reaching created state")]
    Vanished { id: String },

    /// A remote call failed. Carries the failing operation and identifier.
    #[error("{op} {id}: {source}")]
    Remote {
        op: &'static str,
        id: String,
        source: ApiError,
    },

    /// Budget exhausted while the operation was still in flight. The
    /// remote side may still converge later; the whole operation can be
    /// retried.
    #[error("timed out {op} {id} after {elapsed:?}")]
    Timeout {
        op: &'static str,
        id: String,
        elapsed: Duration,
    },
}

impl InstanceError {
    pub(crate) fn remote(op: &'static str, id: &str, source: ApiError) -> Self {
        Self::Remote {
            op,
            id: id.to_string(),
            source,
        }
    }
}
