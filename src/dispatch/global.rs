//! # Process-wide dispatcher instances.
//!
//! Constructing a [`Dispatcher`] at startup and passing it to consumers
//! explicitly is the primary wiring. [`GlobalDispatcher`] is the
//! compatibility shim for hosts that want one shared instance: a lazily
//! initialized holder, usable in `static` position, with exactly-once
//! construction under concurrent first access.
//!
//! ## Example
//! ```
//! use evoke::{ContextId, GlobalDispatcher};
//!
//! static BUS: GlobalDispatcher<u32> = GlobalDispatcher::new();
//!
//! let ctx = ContextId::next();
//! BUS.get().on("tick", ctx, |_n: &u32| {});
//! BUS.get().emit("tick", &1).unwrap();
//! ```

use std::sync::OnceLock;

use crate::config::DispatcherConfig;

use super::Dispatcher;

/// Lazily initialized, process-wide [`Dispatcher`] holder.
///
/// The held dispatcher is constructed on first access and lives for the rest
/// of the process; every subsequent access returns the same instance.
pub struct GlobalDispatcher<T> {
    cell: OnceLock<Dispatcher<T>>,
}

impl<T> GlobalDispatcher<T> {
    /// Creates an empty holder. `const`, so it works in `static` position.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the shared dispatcher, constructing it with the default
    /// configuration on first access.
    pub fn get(&self) -> &Dispatcher<T> {
        self.cell.get_or_init(Dispatcher::new)
    }

    /// Returns the shared dispatcher, constructing it with `config` if this
    /// is the first access.
    ///
    /// If the dispatcher already exists, `config` is ignored.
    pub fn get_or_init_with(&self, config: DispatcherConfig) -> &Dispatcher<T> {
        self.cell.get_or_init(|| Dispatcher::with_config(config))
    }
}

impl<T> Default for GlobalDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}
