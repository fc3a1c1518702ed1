//! Enter-effect return values.
//!
//! An enter effect tells the engine what to do next by returning one of
//! three explicit cases: nothing, a cleanup function, or a deferred
//! computation. The shape is decided once, at effect-return time.

use crate::core::Payload;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;

/// Failure value an effect or cleanup function can surface.
pub type EffectError = Box<dyn std::error::Error + Send + Sync>;

/// A state's enter effect.
pub type Effect = std::sync::Arc<
    dyn Fn(crate::effects::EffectContext) -> Result<EffectFlow, EffectError> + Send + Sync,
>;

/// Cleanup registered by an enter effect; invoked exactly once, on the next
/// outgoing transition or on `stop()`, whichever happens first.
pub type CleanupFn = Box<dyn FnOnce() -> Result<(), EffectError> + Send>;

/// What an enter effect asks the engine to do after it returns.
pub enum EffectFlow {
    /// Nothing further; no cleanup is registered.
    Done,

    /// Store this as the live cleanup handle for the activation.
    Cleanup(CleanupFn),

    /// Run this computation in the background. When it settles, the engine
    /// performs a guarded send of the chart's resolve event (on `Ok`) or
    /// reject event (on `Err`) with the settled value as payload. A
    /// settlement arriving after the machine has moved past the activation
    /// is silently discarded.
    Defer(BoxFuture<'static, Result<Payload, Payload>>),
}

impl EffectFlow {
    /// Register a cleanup function for this activation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flowstate::effects::EffectFlow;
    ///
    /// let flow = EffectFlow::cleanup(|| {
    ///     // release whatever the effect acquired
    ///     Ok(())
    /// });
    /// assert!(matches!(flow, EffectFlow::Cleanup(_)));
    /// ```
    pub fn cleanup<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), EffectError> + Send + 'static,
    {
        EffectFlow::Cleanup(Box::new(f))
    }

    /// Defer to a computation whose success and failure values become the
    /// payloads of the resolve and reject auto-dispatch sends.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flowstate::effects::EffectFlow;
    ///
    /// let flow = EffectFlow::defer(async {
    ///     Ok::<u32, String>(42)
    /// });
    /// assert!(matches!(flow, EffectFlow::Defer(_)));
    /// ```
    pub fn defer<F, T, E>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Any + Send + Sync,
        E: Any + Send + Sync,
    {
        EffectFlow::Defer(
            async move {
                future
                    .await
                    .map(Payload::new)
                    .map_err(Payload::new)
            }
            .boxed(),
        )
    }
}

impl fmt::Debug for EffectFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectFlow::Done => f.write_str("Done"),
            EffectFlow::Cleanup(_) => f.write_str("Cleanup(..)"),
            EffectFlow::Defer(_) => f.write_str("Defer(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defer_wraps_success_and_failure_as_payloads() {
        let EffectFlow::Defer(fut) = EffectFlow::defer(async { Ok::<u32, String>(42) }) else {
            panic!("expected Defer");
        };
        let payload = fut.await.unwrap();
        assert_eq!(payload.downcast_ref::<u32>(), Some(&42));

        let EffectFlow::Defer(fut) =
            EffectFlow::defer(async { Err::<u32, String>("boom".to_string()) })
        else {
            panic!("expected Defer");
        };
        let payload = fut.await.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("boom"));
    }

    #[test]
    fn cleanup_constructor_boxes_the_closure() {
        let flow = EffectFlow::cleanup(|| Ok(()));
        let EffectFlow::Cleanup(f) = flow else {
            panic!("expected Cleanup");
        };
        assert!(f().is_ok());
    }
}
