//! Instance resource handler for the Strato compute orchestration service.
//!
//! Invoked by a declarative-infrastructure engine: the engine supplies a
//! desired [`InstanceSpec`], and the handler converges remote state to
//! match across create, read, update, delete and existence checks,
//! reporting [`ObservedInstance`] back for diffing.
//!
//! Create and delete are asynchronous on the service side; both poll the
//! instance record to a terminal state within a bounded wall-clock
//! budget, distinguishing transient in-between states from the terminal
//! "error" state. Reads are deterministic: network attachments are
//! reported in the service's authoritative order, so repeated reads never
//! show drift to the engine.

mod lifecycle;
mod reader;
mod resource;
mod translate;

pub mod error;
pub mod spec;

pub use error::{InstanceError, ValidationError};
pub use reader::{ObservedAttachment, ObservedInstance};
pub use resource::{InstanceResource, Timeouts};
pub use spec::{DiskSpec, InstanceSpec, NetworkAttachment, VideoSpec};
pub use translate::translate;
