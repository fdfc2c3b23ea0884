//! Panic capture.
//!
//! [`capture_panic`] turns a panicking closure into an `Err(PanicSignal)`, so
//! the `panics` assertion inspects a value instead of unwinding itself.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// A captured panic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .message.as_deref().unwrap_or("panicked with a non-string payload"))]
pub struct PanicSignal {
    /// The panic message, when the payload was a string.
    pub message: Option<String>,
}

impl PanicSignal {
    /// Build a signal from a `catch_unwind` payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        Self { message }
    }

    /// The message, or `""` for non-string payloads.
    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Run `f`, returning `Err` if it panicked.
///
/// The panic hook still runs, so the panic message is printed to the test's
/// captured output as usual.
pub fn capture_panic<F: FnOnce()>(f: F) -> Result<(), PanicSignal> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| PanicSignal::from_payload(&*payload))
}

/// Type name of a function or closure, used to identify it in messages.
pub fn function_name<F>(_f: &F) -> &'static str {
    std::any::type_name::<F>()
}
