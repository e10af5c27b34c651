//! Registration storage: owner identity, subscription records and buckets.
//!
//! ## Data model
//! ```text
//! Dispatcher 1 ──* EventBucket 1 ──* Registration
//!                  (one per name)    { ContextId, Callback<T>, FirePolicy }
//! ```
//!
//! A registration belongs to exactly one bucket. Buckets are kept in creation
//! order and scanned linearly on emit; within a bucket, insertion order is
//! the delivery order, and removals compact the list without reordering.
//!
//! Owner contexts are never inspected or owned by the dispatcher: a
//! [`ContextId`] is all it keeps, used for equality-based removal only. State
//! an owner wants available during delivery lives in the callback closure.

mod bucket;
mod registration;

pub use registration::{Callback, ContextId};

pub(crate) use bucket::EventBucket;
pub(crate) use registration::Registration;
