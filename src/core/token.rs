//! Activation tokens.
//!
//! Every activation of a state's enter effect gets a fresh token. The engine
//! rotates the live token on each state change and on `stop()`; guarded
//! senders and deferred continuations carry the token they were created
//! under and are silently ignored once it no longer matches. That check is
//! the entire cancellation mechanism: stale work is never interrupted, its
//! eventual callback is simply dropped.

use uuid::Uuid;

/// Opaque, identity-comparable marker for one effect activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationToken(Uuid);

impl ActivationToken {
    pub(crate) fn new() -> Self {
        ActivationToken(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_per_activation() {
        assert_ne!(ActivationToken::new(), ActivationToken::new());
    }

    #[test]
    fn copies_compare_equal() {
        let token = ActivationToken::new();
        let copy = token;
        assert_eq!(token, copy);
    }
}
