//! Chart rendering for documentation and debugging.
//!
//! A pure function over the configuration: it reads only the transition
//! table and initial state, never the engine. Presentation code typically
//! pairs it with [`Machine::snapshot`](crate::machine::Machine::snapshot)
//! to highlight the active state.

use crate::core::Chart;
use std::fmt::Write;

/// Options for [`render_mermaid`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// State to mark with the `active` class, if any.
    pub highlight: Option<String>,
}

/// Render a chart as a Mermaid `stateDiagram-v2` document.
///
/// # Example
///
/// ```rust
/// use flowstate::chart;
/// use flowstate::graph::{render_mermaid, RenderOptions};
///
/// let chart = chart! {
///     initial: idle,
///     states: {
///         idle { on: { FETCH => loading } },
///         loading {},
///     }
/// };
///
/// let diagram = render_mermaid(&chart, &RenderOptions::default());
/// assert!(diagram.contains("[*] --> idle"));
/// assert!(diagram.contains("idle --> loading: FETCH"));
/// ```
pub fn render_mermaid(chart: &Chart, options: &RenderOptions) -> String {
    let mut out = String::from("stateDiagram-v2\n");
    let _ = writeln!(out, "    [*] --> {}", chart.initial());

    for state in chart.states() {
        if state.triggers().is_empty() {
            let _ = writeln!(out, "    {}", state.name());
        }
        for trigger in state.triggers() {
            let _ = writeln!(out, "    {} --> {}: {}", state.name(), trigger.target, trigger.event);
        }
    }

    if let Some(highlight) = &options.highlight {
        let _ = writeln!(out, "    classDef active fill:#f2a65a,stroke:#333");
        let _ = writeln!(out, "    class {highlight} active");
    }

    out
}
