//! The context handed to an enter effect.

use crate::core::Payload;
use crate::machine::Sender;

/// Everything an enter effect can see about its own activation.
///
/// `sender` has the same contract as the public `send`, except that it
/// silently no-ops once the activation it was created for has been
/// superseded. `from` and `event` are `None` when the activation came from
/// machine construction rather than a transition.
#[derive(Debug, Clone)]
pub struct EffectContext {
    /// Guarded sender scoped to this activation.
    pub sender: Sender,

    /// Payload carried by the send that caused this activation.
    pub payload: Option<Payload>,

    /// The state being entered.
    pub to: String,

    /// The state transitioned away from, if any.
    pub from: Option<String>,

    /// The event that caused the transition, if any.
    pub event: Option<String>,
}
