//! The declarative configuration table.
//!
//! A [`Chart`] maps state names to their permitted transitions and optional
//! enter effects. It is supplied once at machine construction and never
//! mutated by the engine. States and triggers are kept in declaration order
//! so the "available events" list on a snapshot is deterministic.

use crate::builder::BuildError;
use crate::effects::{Effect, EffectContext, EffectError, EffectFlow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Default event name a deferred computation resolves with.
pub const RESOLVE_EVENT: &str = "SUCCESS";

/// Default event name a deferred computation (or a failed enter effect)
/// rejects with.
pub const REJECT_EVENT: &str = "ERROR";

fn default_resolve_event() -> String {
    RESOLVE_EVENT.to_string()
}

fn default_reject_event() -> String {
    REJECT_EVENT.to_string()
}

/// One permitted transition: `event` moves the machine to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub event: String,
    pub target: String,
}

/// A named state with its transition table and optional enter effect.
///
/// Effects are not part of the serialized form; charts loaded with
/// [`Chart::from_json`] attach them afterwards via [`Chart::on_enter`].
#[derive(Clone, Serialize, Deserialize)]
pub struct StateNode {
    name: String,
    #[serde(default)]
    on: Vec<Trigger>,
    #[serde(skip)]
    enter: Option<Effect>,
}

impl StateNode {
    pub(crate) fn new(name: String, on: Vec<Trigger>, enter: Option<Effect>) -> Self {
        StateNode { name, on, enter }
    }

    /// The state's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state's triggers, in declaration order.
    pub fn triggers(&self) -> &[Trigger] {
        &self.on
    }

    /// Event names this state accepts, in declaration order.
    pub fn events(&self) -> Vec<String> {
        self.on.iter().map(|t| t.event.clone()).collect()
    }

    /// Target state for `event`, if this state declares it.
    pub fn target_for(&self, event: &str) -> Option<&str> {
        self.on
            .iter()
            .find(|t| t.event == event)
            .map(|t| t.target.as_str())
    }

    pub(crate) fn enter(&self) -> Option<&Effect> {
        self.enter.as_ref()
    }

    /// Replace this state's enter effect.
    pub fn set_enter(&mut self, effect: Effect) {
        self.enter = Some(effect);
    }
}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("name", &self.name)
            .field("on", &self.on)
            .field("enter", &self.enter.as_ref().map(|_| "<effect>"))
            .finish()
    }
}

/// The immutable transition table the machine executes.
///
/// # Example
///
/// ```rust
/// use flowstate::builder::{ChartBuilder, StateBuilder};
///
/// let chart = ChartBuilder::new()
///     .initial("idle")
///     .state(StateBuilder::new("idle").on("FETCH", "loading"))
///     .state(StateBuilder::new("loading").on("RESOLVE", "done"))
///     .state(StateBuilder::new("done"))
///     .build()
///     .unwrap();
///
/// assert_eq!(chart.initial(), "idle");
/// assert_eq!(chart.node("idle").unwrap().target_for("FETCH"), Some("loading"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
    initial: String,
    states: Vec<StateNode>,
    #[serde(default = "default_resolve_event")]
    resolve_event: String,
    #[serde(default = "default_reject_event")]
    reject_event: String,
}

impl Chart {
    pub(crate) fn assemble(
        initial: String,
        states: Vec<StateNode>,
        resolve_event: String,
        reject_event: String,
    ) -> Self {
        Chart {
            initial,
            states,
            resolve_event,
            reject_event,
        }
    }

    /// Load a chart from a JSON document.
    ///
    /// The document carries states and triggers only; enter effects are
    /// attached afterwards with [`Chart::on_enter`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use flowstate::core::Chart;
    ///
    /// let chart = Chart::from_json(r#"{
    ///     "initial": "idle",
    ///     "states": [
    ///         { "name": "idle", "on": [{ "event": "FETCH", "target": "loading" }] },
    ///         { "name": "loading" }
    ///     ]
    /// }"#).unwrap();
    ///
    /// assert_eq!(chart.initial(), "idle");
    /// assert_eq!(chart.resolve_event(), "SUCCESS");
    /// ```
    pub fn from_json(document: &str) -> Result<Self, BuildError> {
        let chart: Chart = serde_json::from_str(document)?;
        chart.check_integrity()?;
        Ok(chart)
    }

    /// The configured initial state name.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// All states, in declaration order.
    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    /// Look up a state by name.
    pub fn node(&self, name: &str) -> Option<&StateNode> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Event name used when a deferred computation resolves.
    pub fn resolve_event(&self) -> &str {
        &self.resolve_event
    }

    /// Event name used when a deferred computation rejects or an enter
    /// effect fails.
    pub fn reject_event(&self) -> &str {
        &self.reject_event
    }

    /// Attach an enter effect to an existing state.
    pub fn on_enter<F>(&mut self, state: &str, effect: F) -> Result<(), BuildError>
    where
        F: Fn(EffectContext) -> Result<EffectFlow, EffectError> + Send + Sync + 'static,
    {
        let node = self
            .states
            .iter_mut()
            .find(|s| s.name == state)
            .ok_or_else(|| BuildError::UnknownState(state.to_string()))?;
        node.enter = Some(std::sync::Arc::new(effect));
        Ok(())
    }

    /// Check that every trigger target names a state in the table.
    ///
    /// The engine never calls this; it looks targets up lazily and surfaces
    /// a missing one only when a transition actually reaches it. Callers who
    /// prefer to fail fast can validate after building.
    pub fn validate(&self) -> Result<(), BuildError> {
        for state in &self.states {
            for trigger in &state.on {
                if self.node(&trigger.target).is_none() {
                    return Err(BuildError::UnknownTarget {
                        state: state.name.clone(),
                        event: trigger.event.clone(),
                        target: trigger.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Structural checks shared by the builder and `from_json`: at least one
    /// state, unique state names, unique events per state, and an initial
    /// name that exists. Target existence is deliberately not checked here.
    pub(crate) fn check_integrity(&self) -> Result<(), BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut names = HashSet::new();
        for state in &self.states {
            if !names.insert(state.name.as_str()) {
                return Err(BuildError::DuplicateState(state.name.clone()));
            }

            let mut events = HashSet::new();
            for trigger in &state.on {
                if !events.insert(trigger.event.as_str()) {
                    return Err(BuildError::DuplicateTrigger {
                        state: state.name.clone(),
                        event: trigger.event.clone(),
                    });
                }
            }
        }

        if self.node(&self.initial).is_none() {
            return Err(BuildError::UnknownInitial(self.initial.clone()));
        }

        Ok(())
    }
}
