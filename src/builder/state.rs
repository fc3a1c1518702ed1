//! Builder for individual states.

use crate::core::{StateNode, Trigger};
use crate::effects::{Effect, EffectContext, EffectError, EffectFlow};
use std::sync::Arc;

/// Builder for a single state: its triggers and optional enter effect.
///
/// # Example
///
/// ```rust
/// use flowstate::builder::StateBuilder;
/// use flowstate::effects::EffectFlow;
///
/// let state = StateBuilder::new("loading")
///     .on("SUCCESS", "done")
///     .on("ERROR", "failed")
///     .enter(|_ctx| Ok(EffectFlow::Done));
/// ```
pub struct StateBuilder {
    name: String,
    on: Vec<Trigger>,
    enter: Option<Effect>,
}

impl StateBuilder {
    /// Start a state with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: Vec::new(),
            enter: None,
        }
    }

    /// Declare that `event` moves the machine to `target`. Triggers keep
    /// declaration order; it becomes the order of the snapshot's available
    /// events.
    pub fn on(mut self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.on.push(Trigger {
            event: event.into(),
            target: target.into(),
        });
        self
    }

    /// Attach the state's enter effect.
    pub fn enter<F>(mut self, effect: F) -> Self
    where
        F: Fn(EffectContext) -> Result<EffectFlow, EffectError> + Send + Sync + 'static,
    {
        self.enter = Some(Arc::new(effect));
        self
    }

    pub(crate) fn into_node(self) -> StateNode {
        StateNode::new(self.name, self.on, self.enter)
    }
}
