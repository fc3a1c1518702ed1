//! Builder for charts.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::{Chart, StateNode, REJECT_EVENT, RESOLVE_EVENT};

/// Builder for constructing charts with a fluent API.
///
/// # Example
///
/// ```rust
/// use flowstate::builder::{ChartBuilder, StateBuilder};
///
/// let chart = ChartBuilder::new()
///     .initial("idle")
///     .state(StateBuilder::new("idle").on("FETCH", "loading"))
///     .state(StateBuilder::new("loading").on("SUCCESS", "done"))
///     .state(StateBuilder::new("done"))
///     .build()
///     .unwrap();
///
/// assert_eq!(chart.initial(), "idle");
/// ```
pub struct ChartBuilder {
    initial: Option<String>,
    states: Vec<StateNode>,
    resolve_event: String,
    reject_event: String,
}

impl ChartBuilder {
    /// Create a new builder with the default reserved event names
    /// (`SUCCESS` / `ERROR`).
    pub fn new() -> Self {
        Self {
            initial: None,
            states: Vec::new(),
            resolve_event: RESOLVE_EVENT.to_string(),
            reject_event: REJECT_EVENT.to_string(),
        }
    }

    /// Set the initial state name (required).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a state.
    pub fn state(mut self, state: StateBuilder) -> Self {
        self.states.push(state.into_node());
        self
    }

    /// Override the event name deferred computations resolve with. Use this
    /// when `SUCCESS` collides with your own event vocabulary.
    pub fn resolve_event(mut self, event: impl Into<String>) -> Self {
        self.resolve_event = event.into();
        self
    }

    /// Override the event name deferred computations and failed enter
    /// effects reject with.
    pub fn reject_event(mut self, event: impl Into<String>) -> Self {
        self.reject_event = event.into();
        self
    }

    /// Build the chart.
    ///
    /// Fails when the initial state is missing or undefined, a state or a
    /// trigger event is declared twice, or no states were added. Transition
    /// targets are deliberately not checked here; use [`Chart::validate`]
    /// to check them eagerly.
    pub fn build(self) -> Result<Chart, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let chart = Chart::assemble(initial, self.states, self.resolve_event, self.reject_event);
        chart.check_integrity()?;
        Ok(chart)
    }
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self::new()
    }
}
