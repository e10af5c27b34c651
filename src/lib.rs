//! # evoke
//!
//! **evoke** is a lightweight in-process publish/subscribe event dispatcher.
//!
//! Callers register named events bound to an owner identity ([`ContextId`])
//! and a callback, optionally with a firing policy ([`FirePolicy`]) that
//! controls how many emits the callback survives. Emitting a name invokes
//! every matching registration synchronously, on the emitting thread, in
//! registration order.
//!
//! ## Architecture
//! ```text
//!  on / once / to / at / there            off(names, ctx)   clean()
//!          │                                     │             │
//!          ▼                                     ▼             ▼
//!  ┌────────────────────────────────────────────────────────────────┐
//!  │ Dispatcher<T>                                                  │
//!  │  - ordered EventBuckets, one per event name (creation order)   │
//!  │  - each bucket: ordered Registrations (delivery order)         │
//!  │  - each registration: ContextId + callback + FirePolicy        │
//!  └───────────────────────────┬────────────────────────────────────┘
//!                              │ emit("name", &payload)
//!                              ▼
//!           advance every matching FirePolicy under the lock,
//!           snapshot the callbacks that fire, compact removals,
//!           then invoke the snapshot in order (lock released)
//! ```
//!
//! ## Features
//! | Area             | Description                                                      | Key types                          |
//! |------------------|------------------------------------------------------------------|------------------------------------|
//! | **Registration** | Named events with always/once/counted/skip-then-fire policies.  | [`Dispatcher`], [`FirePolicy`]     |
//! | **Delivery**     | Synchronous fan-out in registration order, panic isolation.     | [`Dispatcher::emit`], [`EmitError`]|
//! | **Removal**      | Owner-scoped removal by identity, full reset.                   | [`ContextId`], [`Dispatcher::off`] |
//! | **Global shim**  | Lazy process-wide instance for hosts that want one shared bus.  | [`GlobalDispatcher`]               |
//! | **Configuration**| Delivery knobs (panic isolation, per-delivery tracing).         | [`DispatcherConfig`]               |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use evoke::{ContextId, Dispatcher};
//!
//! fn main() -> Result<(), evoke::EmitError> {
//!     let bus: Dispatcher<u32> = Dispatcher::new();
//!     let total = Arc::new(AtomicUsize::new(0));
//!
//!     let player = ContextId::next();
//!     let seen = Arc::clone(&total);
//!     bus.once("score", player, move |points: &u32| {
//!         seen.fetch_add(*points as usize, Ordering::SeqCst);
//!     });
//!
//!     bus.emit("score", &10)?;
//!     bus.emit("score", &10)?; // no-op: the registration fired once and is gone
//!     assert_eq!(total.load(Ordering::SeqCst), 10);
//!     Ok(())
//! }
//! ```
//!
//! ## Notes
//! - The dispatcher is generic over one payload type `T`; callers that need
//!   several arguments pass a tuple. Payload content is never inspected.
//! - All methods take `&self`; share a dispatcher behind `&` or `Arc` and use
//!   it freely from inside callbacks (see [`Dispatcher`] for re-entrancy
//!   semantics).
//! - This is not a cross-process bus: no durability, no ordering across
//!   threads, no async scheduling. A slow callback stalls the whole emit.

mod config;
mod dispatch;
mod error;
mod policies;
mod registry;

// ---- Public re-exports ----

pub use config::DispatcherConfig;
pub use dispatch::{Dispatcher, GlobalDispatcher};
pub use error::EmitError;
pub use policies::FirePolicy;
pub use registry::{Callback, ContextId};
