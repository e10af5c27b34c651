//! Error types surfaced by event delivery.
//!
//! Registration never fails, and emitting a name with no registrations or
//! removing a context that matches nothing are defined no-ops. The one
//! failure mode left is a callback panicking mid-delivery, reported by
//! [`EmitError`] when panic isolation is enabled.

use std::sync::Arc;
use thiserror::Error;

/// # Errors produced while emitting events.
///
/// Only returned by [`Dispatcher::emit`](crate::Dispatcher::emit) and
/// [`Dispatcher::emit_many`](crate::Dispatcher::emit_many) when
/// [`DispatcherConfig::isolate_panics`](crate::DispatcherConfig) is enabled.
/// With isolation disabled, a callback panic unwinds through `emit` instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EmitError {
    /// One or more callbacks panicked during a delivery pass.
    ///
    /// Delivery to the remaining registrations still completed; the error is
    /// reported after the full pass.
    #[error("{panicked} callback(s) panicked while emitting \"{event}\"")]
    CallbackPanicked {
        /// Name of the first event whose delivery panicked.
        event: Arc<str>,
        /// Total number of panicking callbacks across the pass.
        panicked: usize,
    },
}

impl EmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evoke::EmitError;
    ///
    /// let err = EmitError::CallbackPanicked { event: "score".into(), panicked: 1 };
    /// assert_eq!(err.as_label(), "callback_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitError::CallbackPanicked { .. } => "callback_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitError::CallbackPanicked { event, panicked } => {
                format!("{panicked} callback(s) panicked while emitting \"{event}\"")
            }
        }
    }
}
