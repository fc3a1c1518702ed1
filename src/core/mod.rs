//! Core data model: the configuration table and the value objects the
//! engine publishes.
//!
//! Everything here is immutable once built:
//! - `Chart`, `StateNode`, `Trigger`: the declarative transition table
//! - `Snapshot`: the externally visible view of the machine
//! - `Payload`: an opaque, identity-preserving event value
//! - `ActivationToken`: the per-activation marker behind cancellation

mod chart;
mod payload;
mod snapshot;
mod token;

pub use chart::{Chart, StateNode, Trigger, REJECT_EVENT, RESOLVE_EVENT};
pub use payload::Payload;
pub use snapshot::Snapshot;
pub use token::ActivationToken;
