//! # In-process publish/subscribe dispatcher.
//!
//! [`Dispatcher`] maps event names to ordered buckets of registrations and
//! delivers payloads synchronously, on the emitting thread, in registration
//! order.
//!
//! ## Emit pass
//! ```text
//! emit("name", &payload)
//!   1. lock the registry
//!   2. advance the FirePolicy of every registration in matching buckets;
//!      snapshot the callbacks that fire, compact removals in the same pass
//!   3. unlock
//!   4. invoke the snapshot in order
//! ```
//!
//! Advancing and compacting before any callback runs means removal side
//! effects can never skip or double-process a registration, and the lock is
//! never held while user code runs.
//!
//! ## Re-entrancy
//! Callbacks may freely call `on`, `off`, `emit` or `clean` on the same
//! dispatcher:
//! - a re-entrant `emit` takes a fresh snapshot of the registry as left by
//!   step 2 of the outer pass;
//! - a registration added mid-pass is first considered on the next emit;
//! - an `off`/`clean` mid-pass does not recall callbacks already snapshotted
//!   for the current pass.
//!
//! ## What it does **not** guarantee
//! - No ordering across threads: concurrent emits snapshot sequentially but
//!   their deliveries may interleave.
//! - No async scheduling, timeouts or cancellation: a slow callback stalls
//!   the entire emit call.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::config::DispatcherConfig;
use crate::error::EmitError;
use crate::policies::FirePolicy;
use crate::registry::{Callback, ContextId, EventBucket, Registration};

/// One snapshotted delivery: the event name and the callback to invoke.
struct Firing<T> {
    event: Arc<str>,
    callback: Callback<T>,
}

/// Named-event dispatcher, generic over one payload type `T`.
///
/// All methods take `&self`; internal state is protected by a
/// `parking_lot::Mutex` that is never held while callbacks run. The
/// dispatcher is `Send + Sync` for any `T`, since it only ever stores
/// callbacks, never payloads.
///
/// # Example
/// ```
/// use evoke::{ContextId, Dispatcher};
///
/// let bus: Dispatcher<(u32, u32)> = Dispatcher::new();
/// let ctx = ContextId::next();
/// bus.on("moved", ctx, |&(x, y): &(u32, u32)| {
///     assert_eq!((x, y), (3, 4));
/// });
/// bus.emit("moved", &(3, 4)).unwrap();
/// ```
pub struct Dispatcher<T> {
    buckets: Mutex<Vec<EventBucket<T>>>,
    config: DispatcherConfig,
}

impl<T> Dispatcher<T> {
    /// Creates an empty dispatcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Creates an empty dispatcher with the given configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            buckets: Mutex::new(Vec::new()),
            config,
        }
    }

    // ---- Registration ----

    /// Registers `callback` for `name` under `context` with an explicit
    /// firing policy.
    ///
    /// Appends to the bucket for `name`, creating the bucket on first use.
    /// Registration order within a bucket is the delivery order.
    pub fn register(
        &self,
        name: &str,
        context: ContextId,
        callback: impl Fn(&T) + Send + Sync + 'static,
        policy: FirePolicy,
    ) {
        debug!(event = name, context = %context, policy = ?policy, "registering event callback");
        let registration = Registration {
            context,
            callback: Arc::new(callback) as Callback<T>,
            policy,
        };
        let mut buckets = self.buckets.lock();
        match buckets.iter_mut().find(|b| &*b.name == name) {
            Some(bucket) => bucket.registrations.push(registration),
            None => {
                let mut bucket = EventBucket::new(name);
                bucket.registrations.push(registration);
                buckets.push(bucket);
            }
        }
    }

    /// Registers a callback that fires on every emit of `name`, forever.
    pub fn on(
        &self,
        name: &str,
        context: ContextId,
        callback: impl Fn(&T) + Send + Sync + 'static,
    ) {
        self.register(name, context, callback, FirePolicy::AlwaysOn);
    }

    /// Registers a callback that fires on the first emit of `name`, then
    /// deregisters itself.
    pub fn once(
        &self,
        name: &str,
        context: ContextId,
        callback: impl Fn(&T) + Send + Sync + 'static,
    ) {
        self.register(name, context, callback, FirePolicy::Once);
    }

    /// Registers a callback that fires on each of the next `count` emits of
    /// `name`, then deregisters itself.
    ///
    /// The registration is compacted away on the emit after its last fire,
    /// without firing again.
    pub fn to(
        &self,
        name: &str,
        context: ContextId,
        callback: impl Fn(&T) + Send + Sync + 'static,
        count: u32,
    ) {
        self.register(name, context, callback, FirePolicy::Times(count));
    }

    /// Registers a callback that stays silent for the first `threshold - 1`
    /// emits of `name`, then fires on every emit from the `threshold`-th
    /// onward. Never deregisters itself.
    ///
    /// `at(.., 1)` and `at(.., 0)` both fire from the first emit.
    pub fn at(
        &self,
        name: &str,
        context: ContextId,
        callback: impl Fn(&T) + Send + Sync + 'static,
        threshold: u32,
    ) {
        let skips = threshold.saturating_sub(1);
        self.register(name, context, callback, FirePolicy::FireAfterSkip(skips));
    }

    /// Registers a callback that stays silent for the first `skips` emits of
    /// `name`, fires exactly once on the emit after that, then deregisters
    /// itself.
    pub fn there(
        &self,
        name: &str,
        context: ContextId,
        callback: impl Fn(&T) + Send + Sync + 'static,
        skips: u32,
    ) {
        self.register(name, context, callback, FirePolicy::FireOnceAfterSkip(skips));
    }

    // ---- Emission ----

    /// Emits `name`, invoking every matching registration with `payload`.
    ///
    /// Callbacks run synchronously in registration order, after the registry
    /// lock has been released. Emitting a name with no registrations is a
    /// no-op.
    ///
    /// # Errors
    /// [`EmitError::CallbackPanicked`] if panic isolation is enabled and at
    /// least one callback panicked; delivery to the rest still completed.
    /// With isolation disabled, the panic propagates instead.
    pub fn emit(&self, name: &str, payload: &T) -> Result<(), EmitError> {
        self.emit_many(&[name], payload)
    }

    /// Emits several names in caller order with the same payload.
    ///
    /// Equivalent to calling [`emit`](Self::emit) per name, except that the
    /// policy advancement for all names happens in one locked pass before
    /// any callback runs. Names without registrations are no-ops.
    pub fn emit_many(&self, names: &[&str], payload: &T) -> Result<(), EmitError> {
        let fired = self.advance_and_snapshot(names);
        self.deliver(fired, payload)
    }

    /// Advances policies for all matching registrations, compacting removals
    /// and snapshotting the callbacks that fire. Holds the lock; runs no user
    /// code.
    fn advance_and_snapshot(&self, names: &[&str]) -> Vec<Firing<T>> {
        let mut fired = Vec::new();
        let mut buckets = self.buckets.lock();
        for name in names {
            for bucket in buckets.iter_mut().filter(|b| &*b.name == *name) {
                let event = Arc::clone(&bucket.name);
                bucket.registrations.retain_mut(|registration| {
                    let step = registration.policy.advance();
                    if step.fires() {
                        fired.push(Firing {
                            event: Arc::clone(&event),
                            callback: Arc::clone(&registration.callback),
                        });
                    }
                    !step.removes()
                });
            }
        }
        fired
    }

    /// Invokes a snapshot of callbacks in order, without holding the lock.
    fn deliver(&self, fired: Vec<Firing<T>>, payload: &T) -> Result<(), EmitError> {
        if !self.config.isolate_panics {
            for firing in fired {
                if self.config.trace_delivery {
                    trace!(event = %firing.event, "delivering event callback");
                }
                (firing.callback)(payload);
            }
            return Ok(());
        }

        let mut panicked = 0usize;
        let mut first_event: Option<Arc<str>> = None;
        for firing in fired {
            if self.config.trace_delivery {
                trace!(event = %firing.event, "delivering event callback");
            }
            let result = panic::catch_unwind(AssertUnwindSafe(|| (firing.callback)(payload)));
            if let Err(cause) = result {
                error!(
                    event = %firing.event,
                    panic = panic_message(&*cause),
                    "callback panicked during emit"
                );
                panicked += 1;
                if first_event.is_none() {
                    first_event = Some(firing.event);
                }
            }
        }
        match first_event {
            Some(event) => Err(EmitError::CallbackPanicked { event, panicked }),
            None => Ok(()),
        }
    }

    // ---- Removal ----

    /// Removes, from every bucket named in `names`, all registrations whose
    /// owner equals `context`.
    ///
    /// Surviving registrations keep their relative order. A context that
    /// matches nothing is a no-op.
    pub fn off(&self, names: &[&str], context: ContextId) {
        let mut removed = 0usize;
        let mut buckets = self.buckets.lock();
        for bucket in buckets
            .iter_mut()
            .filter(|b| names.contains(&&*b.name))
        {
            let before = bucket.registrations.len();
            bucket.registrations.retain(|r| r.context != context);
            removed += before - bucket.registrations.len();
        }
        if removed > 0 {
            debug!(context = %context, removed, "removed event registrations");
        }
    }

    /// Removes every bucket and registration.
    ///
    /// Only drops the dispatcher's references; callback closures and whatever
    /// they capture are released, nothing else is touched.
    pub fn clean(&self) {
        let mut buckets = self.buckets.lock();
        debug!(buckets = buckets.len(), "clearing all event registrations");
        buckets.clear();
    }

    // ---- Introspection ----

    /// Number of live registrations for `name`.
    #[must_use]
    pub fn registration_count(&self, name: &str) -> usize {
        self.buckets
            .lock()
            .iter()
            .filter(|b| &*b.name == name)
            .map(|b| b.registrations.len())
            .sum()
    }

    /// True if no registration is live for any name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets
            .lock()
            .iter()
            .all(|b| b.registrations.is_empty())
    }
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort extraction of a panic payload message.
fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(s) = cause.downcast_ref::<&str>() {
        s
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&i32) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        (count, move |_: &i32| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_on_fires_on_every_emit() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let (count, cb) = counter();
        bus.on("tick", ContextId::next(), cb);

        for _ in 0..5 {
            bus.emit("tick", &0).unwrap();
        }
        assert_eq!(count.load(Ordering::SeqCst), 5);
        assert_eq!(bus.registration_count("tick"), 1);
    }

    #[test]
    fn test_once_invokes_exactly_once() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let ctx = ContextId::next();
        let (count, cb) = counter();
        bus.once("tick", ctx, cb);

        bus.emit("tick", &0).unwrap();
        bus.emit("tick", &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.registration_count("tick"), 0);
    }

    #[test]
    fn test_to_fires_n_times_then_gone() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let (count, cb) = counter();
        bus.to("tick", ContextId::next(), cb, 3);

        for _ in 0..3 {
            bus.emit("tick", &0).unwrap();
        }
        assert_eq!(count.load(Ordering::SeqCst), 3);
        // Exhausted but still registered: removal happens on the next emit.
        assert_eq!(bus.registration_count("tick"), 1);

        bus.emit("tick", &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(bus.registration_count("tick"), 0);
    }

    #[test]
    fn test_at_suppresses_then_fires_forever() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let (count, cb) = counter();
        bus.at("tick", ContextId::next(), cb, 3);

        bus.emit("tick", &0).unwrap();
        bus.emit("tick", &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        for _ in 0..3 {
            bus.emit("tick", &0).unwrap();
        }
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(bus.registration_count("tick"), 1);
    }

    #[test]
    fn test_at_receives_the_triggering_payload() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.at(
            "levelup",
            ContextId::next(),
            move |n: &i32| sink.lock().unwrap().push(*n),
            3,
        );

        for n in [1, 2, 3] {
            bus.emit("levelup", &n).unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec![3]);
    }

    #[test]
    fn test_there_fires_once_after_skips() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let (count, cb) = counter();
        bus.there("tick", ContextId::next(), cb, 2);

        bus.emit("tick", &0).unwrap();
        bus.emit("tick", &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        bus.emit("tick", &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.registration_count("tick"), 0);

        bus.emit("tick", &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_preserves_registration_order() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let order = Arc::new(StdMutex::new(Vec::new()));

        let sink = Arc::clone(&order);
        bus.on("score", ContextId::next(), move |n: &i32| {
            sink.lock().unwrap().push(("cb1", *n));
        });
        let sink = Arc::clone(&order);
        bus.on("score", ContextId::next(), move |n: &i32| {
            sink.lock().unwrap().push(("cb2", *n));
        });

        bus.emit("score", &10).unwrap();
        bus.emit_many(&["score", "missing"], &5).unwrap();

        assert_eq!(
            *order.lock().unwrap(),
            vec![("cb1", 10), ("cb2", 10), ("cb1", 5), ("cb2", 5)],
        );
    }

    #[test]
    fn test_emit_unknown_name_is_noop() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        bus.emit("nothing", &0).unwrap();
        assert!(bus.is_empty());
    }

    #[test]
    fn test_emit_many_processes_names_in_caller_order() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let order = Arc::new(StdMutex::new(Vec::new()));

        let sink = Arc::clone(&order);
        bus.on("b", ContextId::next(), move |_: &i32| {
            sink.lock().unwrap().push("b");
        });
        let sink = Arc::clone(&order);
        bus.on("a", ContextId::next(), move |_: &i32| {
            sink.lock().unwrap().push("a");
        });

        // Bucket creation order is b, a; caller order wins.
        bus.emit_many(&["a", "b"], &0).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_off_removes_only_matching_context_and_name() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let alice = ContextId::next();
        let bob = ContextId::next();

        let (alice_score, cb) = counter();
        bus.on("score", alice, cb);
        let (bob_score, cb) = counter();
        bus.on("score", bob, cb);
        let (alice_level, cb) = counter();
        bus.on("level", alice, cb);

        bus.off(&["score"], alice);

        bus.emit("score", &0).unwrap();
        bus.emit("level", &0).unwrap();
        assert_eq!(alice_score.load(Ordering::SeqCst), 0);
        assert_eq!(bob_score.load(Ordering::SeqCst), 1);
        assert_eq!(alice_level.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_off_unknown_context_is_noop() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let (count, cb) = counter();
        bus.on("tick", ContextId::next(), cb);

        bus.off(&["tick"], ContextId::next());
        bus.emit("tick", &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clean_drops_everything() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        let (count, cb) = counter();
        bus.on("tick", ContextId::next(), cb);
        let (count2, cb) = counter();
        bus.once("tock", ContextId::next(), cb);

        bus.clean();
        assert!(bus.is_empty());

        bus.emit_many(&["tick", "tock"], &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(count2.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_callback_is_isolated() {
        let bus: Dispatcher<i32> = Dispatcher::new();
        bus.on("boom", ContextId::next(), |_: &i32| panic!("kaboom"));
        let (count, cb) = counter();
        bus.on("boom", ContextId::next(), cb);

        let err = bus.emit("boom", &0).unwrap_err();
        match err {
            EmitError::CallbackPanicked { event, panicked } => {
                assert_eq!(&*event, "boom");
                assert_eq!(panicked, 1);
            }
        }
        // The second callback still ran.
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[should_panic(expected = "kaboom")]
    fn test_panic_propagates_without_isolation() {
        let config = DispatcherConfig {
            isolate_panics: false,
            ..DispatcherConfig::default()
        };
        let bus: Dispatcher<i32> = Dispatcher::with_config(config);
        bus.on("boom", ContextId::next(), |_: &i32| panic!("kaboom"));
        let _ = bus.emit("boom", &0);
    }

    #[test]
    fn test_registration_during_emit_waits_for_next_round() {
        let bus: Arc<Dispatcher<i32>> = Arc::new(Dispatcher::new());
        let late = Arc::new(AtomicUsize::new(0));

        let handle = Arc::clone(&bus);
        let late_count = Arc::clone(&late);
        bus.once("tick", ContextId::next(), move |_: &i32| {
            let seen = Arc::clone(&late_count);
            handle.on("tick", ContextId::next(), move |_: &i32| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        });

        bus.emit("tick", &0).unwrap();
        assert_eq!(late.load(Ordering::SeqCst), 0);

        bus.emit("tick", &0).unwrap();
        assert_eq!(late.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_emit_from_callback() {
        let bus: Arc<Dispatcher<i32>> = Arc::new(Dispatcher::new());
        let (count, cb) = counter();
        bus.on("inner", ContextId::next(), cb);

        let handle = Arc::clone(&bus);
        bus.on("outer", ContextId::next(), move |_: &i32| {
            handle.emit("inner", &0).unwrap();
        });

        bus.emit("outer", &0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
