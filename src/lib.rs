//! Flowstate: a declarative finite-state-machine execution engine.
//!
//! A machine is built from an immutable [`Chart`]: a table of states, their
//! permitted event transitions, and optional per-state enter effects. The
//! engine tracks exactly one active state, dispatches events to compute the
//! next state, runs enter effects with automatic cleanup of the previous
//! state's effect, and supports effects that complete asynchronously,
//! auto-advancing the machine when they settle.
//!
//! # Core Concepts
//!
//! - **Chart**: the declarative transition table, built with
//!   [`ChartBuilder`] or the [`chart!`] macro
//! - **Machine**: the transition engine; `send` events, `subscribe` to
//!   snapshots, `stop` to release the pending effect resource
//! - **Effects**: per-state enter functions returning an [`EffectFlow`]
//!   (nothing, a cleanup function, or a deferred computation)
//! - **Snapshot**: immutable view of the current state, its available
//!   events, and the last payload; replaced only on real state changes
//!
//! # Example
//!
//! ```rust
//! use flowstate::{chart, Machine};
//!
//! let chart = chart! {
//!     initial: idle,
//!     states: {
//!         idle { on: { FETCH => loading } },
//!         loading { on: { RESOLVE => success, ERROR => failure } },
//!         success {},
//!         failure {},
//!     }
//! };
//!
//! let machine = Machine::new(chart).unwrap();
//! machine.send("FETCH").unwrap();
//!
//! let snapshot = machine.snapshot();
//! assert_eq!(snapshot.state, "loading");
//! assert_eq!(snapshot.events, vec!["RESOLVE", "ERROR"]);
//!
//! machine.stop();
//! ```

pub mod adapter;
pub mod builder;
pub mod core;
pub mod effects;
pub mod graph;
pub mod machine;

// Re-export commonly used types
pub use adapter::StateWatch;
pub use builder::{BuildError, ChartBuilder, StateBuilder};
pub use core::{Chart, Payload, Snapshot, StateNode, Trigger, REJECT_EVENT, RESOLVE_EVENT};
pub use effects::{EffectContext, EffectError, EffectFlow};
pub use graph::{render_mermaid, RenderOptions};
pub use machine::{EffectFault, Machine, MachineError, Phase, Sender, Subscription};
