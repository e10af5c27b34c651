//! # Subscription records and owner identity.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::policies::FirePolicy;

/// Global counter backing [`ContextId::next`].
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Callback invoked for each fired registration.
///
/// Receives a shared reference to the emitted payload. Stored behind an
/// `Arc` so the dispatcher can snapshot callbacks cheaply during an emit
/// pass.
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

/// Stable identity of a registration owner.
///
/// The dispatcher matches on this identifier alone when removing
/// registrations via [`off`](crate::Dispatcher::off); it never compares
/// owner state structurally.
///
/// Mint one id per logical owner with [`ContextId::next`], or wrap a
/// caller-chosen key with [`ContextId::from_raw`]. Mixing both schemes in
/// one process risks collisions; pick one per application.
///
/// # Example
/// ```
/// use evoke::ContextId;
///
/// let a = ContextId::next();
/// let b = ContextId::next();
/// assert_ne!(a, b);
/// assert_eq!(ContextId::from_raw(7), ContextId::from(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// Returns a fresh, process-unique identifier.
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Wraps a caller-chosen raw identifier.
    #[inline]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for ContextId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context-{}", self.0)
    }
}

/// One subscription: owner identity, callback and firing policy.
pub(crate) struct Registration<T> {
    pub(crate) context: ContextId,
    pub(crate) callback: Callback<T>,
    pub(crate) policy: FirePolicy,
}
