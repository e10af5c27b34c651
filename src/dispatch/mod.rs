//! The dispatcher: registration, emission and removal.
//!
//! ## Contents
//! - [`Dispatcher`] the registration/emission engine
//! - [`GlobalDispatcher`] lazy process-wide holder for hosts that want one
//!   shared instance
//!
//! Constructing a [`Dispatcher`] and passing it to consumers explicitly is
//! the primary wiring; reach for [`GlobalDispatcher`] only when a single
//! shared bus is genuinely wanted.

mod dispatcher;
mod global;

pub use dispatcher::Dispatcher;
pub use global::GlobalDispatcher;
