//! Structured failures surfaced by the transition engine.

use crate::effects::EffectError;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The engine phase a failure was classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The initial state's enter effect failed at construction.
    Init,
    /// A state's enter effect failed synchronously during a transition.
    Enter,
    /// A cleanup function failed; the transition was aborted.
    Cleanup,
}

/// A classified engine failure with the transition metadata that was
/// available when it happened and the original cause as `source`.
///
/// Cleanup failures abort the transition: the machine is left exactly as it
/// was before the `send` call. Enter failures are raised after the machine
/// has already committed to the target state, so the machine stays in the
/// (now broken) target; callers should declare a reject-event transition on
/// any state with a fallible effect. Init failures mean no machine was
/// constructed at all.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("enter effect for initial state '{state}' failed")]
    Init {
        state: String,
        #[source]
        source: EffectError,
    },

    #[error("enter effect for state '{to}' failed (from '{from}' on '{event}')")]
    Enter {
        from: String,
        event: String,
        to: String,
        #[source]
        source: EffectError,
    },

    #[error("cleanup for state '{from}' failed (on '{event}' towards '{to}')")]
    Cleanup {
        from: String,
        event: String,
        to: String,
        #[source]
        source: EffectError,
    },
}

impl MachineError {
    /// Which phase this failure was classified under.
    pub fn phase(&self) -> Phase {
        match self {
            MachineError::Init { .. } => Phase::Init,
            MachineError::Enter { .. } => Phase::Enter,
            MachineError::Cleanup { .. } => Phase::Cleanup,
        }
    }
}

/// Failures the engine itself produces while running an effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectFault {
    /// A transition committed to a state the chart does not define. Targets
    /// are looked up lazily, so this surfaces only when the missing state is
    /// actually entered.
    #[error("state '{0}' is not defined in the chart")]
    UnknownState(String),

    /// An effect returned a deferred computation but no tokio runtime was
    /// available to run it on.
    #[error("enter effect returned a deferred computation outside a tokio runtime")]
    DeferWithoutRuntime,
}

/// Wrapper for an effect failure that was routed through the reject event
/// and came back unhandled. The shared handle is the same one the recovery
/// payload carried.
#[derive(Debug)]
pub(crate) struct Unrecovered(pub Arc<dyn Error + Send + Sync>);

impl fmt::Display for Unrecovered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Error for Unrecovered {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_matches_variant() {
        let init = MachineError::Init {
            state: "a".into(),
            source: "boom".into(),
        };
        let enter = MachineError::Enter {
            from: "a".into(),
            event: "GO".into(),
            to: "b".into(),
            source: "boom".into(),
        };
        let cleanup = MachineError::Cleanup {
            from: "a".into(),
            event: "GO".into(),
            to: "b".into(),
            source: "boom".into(),
        };

        assert_eq!(init.phase(), Phase::Init);
        assert_eq!(enter.phase(), Phase::Enter);
        assert_eq!(cleanup.phase(), Phase::Cleanup);
    }

    #[test]
    fn errors_carry_transition_metadata_in_message() {
        let err = MachineError::Enter {
            from: "idle".into(),
            event: "FETCH".into(),
            to: "loading".into(),
            source: "boom".into(),
        };

        let message = err.to_string();
        assert!(message.contains("loading"));
        assert!(message.contains("idle"));
        assert!(message.contains("FETCH"));
    }

    #[test]
    fn source_preserves_original_cause() {
        let err = MachineError::Cleanup {
            from: "a".into(),
            event: "GO".into(),
            to: "b".into(),
            source: "socket already closed".into(),
        };

        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "socket already closed");
    }
}
