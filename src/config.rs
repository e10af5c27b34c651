//! # Dispatcher configuration.
//!
//! [`DispatcherConfig`] centralizes the delivery knobs of a
//! [`Dispatcher`](crate::Dispatcher). It is consumed at construction time
//! via [`Dispatcher::with_config`](crate::Dispatcher::with_config); the
//! default configuration is what [`Dispatcher::new`](crate::Dispatcher::new)
//! uses.

/// Delivery configuration for a dispatcher.
///
/// ## Field semantics
/// - `isolate_panics`: contain callback panics to the failing callback
/// - `trace_delivery`: log every delivered callback at `trace` level
#[derive(Clone, Copy, Debug)]
pub struct DispatcherConfig {
    /// Catch panics raised by individual callbacks during an emit pass.
    ///
    /// When enabled, a panicking callback does not abort delivery to the
    /// remaining registrations; the panic is logged and the emit reports it
    /// afterwards as [`EmitError::CallbackPanicked`](crate::EmitError).
    ///
    /// When disabled, the panic unwinds straight through `emit` and the
    /// remaining callbacks of that pass are not invoked. Policy counters
    /// have already advanced for the whole pass either way.
    pub isolate_panics: bool,

    /// Log a `trace` line for every delivered callback.
    ///
    /// Off by default; per-delivery tracing is noisy on hot paths.
    pub trace_delivery: bool,
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `isolate_panics = true` (a misbehaving subscriber cannot starve the rest)
    /// - `trace_delivery = false`
    fn default() -> Self {
        Self {
            isolate_panics: true,
            trace_delivery: false,
        }
    }
}
