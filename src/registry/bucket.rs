//! # Named event buckets.

use std::sync::Arc;

use super::Registration;

/// Ordered registrations sharing one event name.
///
/// Created on the first registration of a name and never pruned: a bucket
/// whose registrations have all been removed stays in the scan list, empty.
/// The name is stored as `Arc<str>` so emit passes can tag snapshotted
/// callbacks with their event without reallocating.
pub(crate) struct EventBucket<T> {
    pub(crate) name: Arc<str>,
    pub(crate) registrations: Vec<Registration<T>>,
}

impl<T> EventBucket<T> {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            registrations: Vec::new(),
        }
    }
}
