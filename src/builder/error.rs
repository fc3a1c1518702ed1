//! Build errors for charts.

use thiserror::Error;

/// Errors that can occur when building or loading a chart.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(name) before .build()")]
    MissingInitialState,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error("Initial state '{0}' is not defined in the chart")]
    UnknownInitial(String),

    #[error("State '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("State '{state}' declares event '{event}' more than once")]
    DuplicateTrigger { state: String, event: String },

    #[error("State '{state}' routes '{event}' to undefined state '{target}'")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },

    #[error("State '{0}' is not defined in the chart")]
    UnknownState(String),

    #[error("Invalid chart document")]
    Json(#[from] serde_json::Error),
}
