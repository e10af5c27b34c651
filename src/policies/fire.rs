//! # Per-registration firing state machine.
//!
//! [`FirePolicy`] determines how a registration reacts to emits of its event:
//!
//! - [`FirePolicy::AlwaysOn`] fire on every emit, forever (the default).
//! - [`FirePolicy::Once`] fire on the first emit, then deregister.
//! - [`FirePolicy::Times`] fire on each emit while shots remain, then deregister.
//! - [`FirePolicy::FireAfterSkip`] stay silent for `n` emits, fire on every emit after.
//! - [`FirePolicy::FireOnceAfterSkip`] stay silent for `n` emits, fire exactly once, deregister.
//!
//! Exactly one policy is attached to a registration at creation time and is
//! never re-derived afterwards. Counters live inside the variants and are
//! decremented in place as emits pass.
//!
//! ## Counter timelines
//! ```text
//! emit #               1     2     3     4     5
//! AlwaysOn             fire  fire  fire  fire  fire ...
//! Once                 fire  (gone)
//! Times(3)             fire  fire  fire  (removed, silent)
//! FireAfterSkip(2)     -     -     fire  fire  fire ...
//! FireOnceAfterSkip(2) -     -     fire  (gone)
//! ```
//!
//! A `Times` registration is **not** removed on the emit that fires its last
//! shot; it lingers with an exhausted counter and is compacted away on the
//! next emit of the same event, without firing again.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use evoke::{ContextId, Dispatcher, FirePolicy};
//!
//! let bus: Dispatcher<()> = Dispatcher::new();
//! let calls = Arc::new(AtomicUsize::new(0));
//!
//! let seen = Arc::clone(&calls);
//! bus.register("tick", ContextId::next(), move |_| {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! }, FirePolicy::Times(2));
//!
//! for _ in 0..5 {
//!     bus.emit("tick", &()).unwrap();
//! }
//! assert_eq!(calls.load(Ordering::SeqCst), 2);
//! ```

/// Firing behavior of a single registration.
///
/// Counted variants hold their remaining counter; the dispatcher mutates it
/// in place via [`FirePolicy::advance`] on every emit of the matching event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirePolicy {
    /// Fire on every emit; the registration persists indefinitely.
    AlwaysOn,
    /// Fire on the first emit, then remove the registration.
    Once,
    /// Fire on each emit while shots remain, decrementing per fire.
    ///
    /// Once exhausted, the next emit removes the registration **without**
    /// firing: `Times(n)` fires exactly `n` times over `n` emits and is gone
    /// by the end of emit `n + 1`.
    Times(u32),
    /// Stay silent for the given number of emits, then fire on every
    /// subsequent emit. Never removed automatically.
    FireAfterSkip(u32),
    /// Stay silent for the given number of emits, fire exactly once on the
    /// emit after that, then remove the registration.
    FireOnceAfterSkip(u32),
}

/// Outcome of advancing a policy by one emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Invoke the callback; keep the registration.
    Fire,
    /// Skip the callback; keep the registration.
    Skip,
    /// Invoke the callback, then remove the registration.
    FireAndRemove,
    /// Remove the registration without invoking the callback.
    Remove,
}

impl Advance {
    #[inline]
    pub(crate) fn fires(self) -> bool {
        matches!(self, Advance::Fire | Advance::FireAndRemove)
    }

    #[inline]
    pub(crate) fn removes(self) -> bool {
        matches!(self, Advance::FireAndRemove | Advance::Remove)
    }
}

impl FirePolicy {
    /// Advances the state machine by one emit of the matching event.
    ///
    /// Mutates internal counters and returns what the dispatcher should do
    /// with the registration for this emit.
    pub(crate) fn advance(&mut self) -> Advance {
        match self {
            FirePolicy::AlwaysOn => Advance::Fire,
            FirePolicy::Once => Advance::FireAndRemove,
            FirePolicy::Times(0) => Advance::Remove,
            FirePolicy::Times(remaining) => {
                *remaining -= 1;
                Advance::Fire
            }
            FirePolicy::FireAfterSkip(0) => Advance::Fire,
            FirePolicy::FireAfterSkip(remaining) => {
                *remaining -= 1;
                Advance::Skip
            }
            FirePolicy::FireOnceAfterSkip(0) => Advance::FireAndRemove,
            FirePolicy::FireOnceAfterSkip(remaining) => {
                *remaining -= 1;
                Advance::Skip
            }
        }
    }
}

impl Default for FirePolicy {
    /// Returns [`FirePolicy::AlwaysOn`].
    fn default() -> Self {
        FirePolicy::AlwaysOn
    }
}
