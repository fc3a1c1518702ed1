//! Opaque event payloads.
//!
//! A payload is an arbitrary caller-supplied value carried by a `send` call
//! and surfaced unchanged on the resulting snapshot and effect context.
//! Clones of a payload share one allocation, so identity is preserved
//! end to end rather than copied.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an error routed through the reject event.
type DynError = Arc<dyn Error + Send + Sync>;

/// A cheaply clonable handle to an arbitrary value.
///
/// # Example
///
/// ```rust
/// use flowstate::core::Payload;
///
/// let payload = Payload::new(42u32);
/// let copy = payload.clone();
///
/// assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
/// assert!(Payload::ptr_eq(&payload, &copy));
/// ```
#[derive(Clone)]
pub struct Payload(Arc<dyn Any + Send + Sync>);

impl Payload {
    /// Wrap a value in a payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Payload(Arc::new(value))
    }

    /// Wrap an error so a reject-event handler can inspect it via
    /// [`Payload::as_error`]. This is the shape the engine itself uses when
    /// it reroutes a failed enter effect through the reject event.
    pub fn from_error<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let shared: DynError = Arc::from(err.into());
        Payload::new(shared)
    }

    /// Borrow the contained value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Check whether the contained value has type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Borrow the contained error, if this payload was built with
    /// [`Payload::from_error`].
    pub fn as_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.downcast_ref::<DynError>().map(|e| &**e)
    }

    /// Identity comparison: true when both handles share one allocation.
    pub fn ptr_eq(a: &Payload, b: &Payload) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_returns_original_value() {
        let payload = Payload::new(String::from("hello"));

        assert!(payload.is::<String>());
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert!(payload.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn clones_share_identity() {
        let payload = Payload::new(vec![1, 2, 3]);
        let copy = payload.clone();

        assert!(Payload::ptr_eq(&payload, &copy));

        let other = Payload::new(vec![1, 2, 3]);
        assert!(!Payload::ptr_eq(&payload, &other));
    }

    #[test]
    fn error_payload_exposes_message() {
        let payload = Payload::from_error("request timed out");

        let err = payload.as_error().expect("error payload");
        assert_eq!(err.to_string(), "request timed out");
    }

    #[test]
    fn plain_payload_is_not_an_error() {
        let payload = Payload::new(7i64);

        assert!(payload.as_error().is_none());
    }
}
