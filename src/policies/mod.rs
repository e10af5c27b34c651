//! Firing policies for event registrations.
//!
//! This module holds the per-registration state machine that decides, on
//! every emit of a matching event, whether the callback runs and whether
//! the registration survives the emit.
//!
//! ## Contents
//! - [`FirePolicy`] the five firing behaviors a registration can carry
//!
//! ## Quick wiring
//! ```text
//! Registration { policy: FirePolicy, .. }
//!      └─► dispatch::Dispatcher advances the policy once per matching emit:
//!           - fire?   → callback is snapshotted for delivery
//!           - remove? → registration is compacted out of its bucket
//! ```

mod fire;

pub use fire::FirePolicy;
