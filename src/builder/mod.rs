//! Builder API for ergonomic chart construction.
//!
//! This module provides fluent builders and the [`chart!`](crate::chart)
//! macro for declaring transition tables with minimal boilerplate.

pub mod chart;
pub mod error;
pub mod macros;
pub mod state;

pub use chart::ChartBuilder;
pub use error::BuildError;
pub use state::StateBuilder;
