//! Enter effects and their lifecycle types.
//!
//! A state's enter effect is a caller-supplied function invoked when the
//! state becomes active. It receives an [`EffectContext`] and returns an
//! [`EffectFlow`] telling the engine what to do next:
//!
//! - `Done`: nothing further
//! - `Cleanup(f)`: run `f` when the state is left or the machine stops
//! - `Defer(fut)`: run `fut` in the background and auto-dispatch the
//!   chart's resolve or reject event when it settles
//!
//! A synchronous `Err` from an effect is given one recovery attempt: the
//! engine performs a guarded send of the reject event carrying the error as
//! payload, and only re-raises if that send does not change state.

mod context;
mod flow;

pub use context::EffectContext;
pub use flow::{CleanupFn, Effect, EffectError, EffectFlow};
