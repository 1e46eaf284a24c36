//! Realtime-safe memory pool and the lists built on it.
//!
//! - [`RtMemoryPool`]: fixed-size node pool, non-blocking ("atomic") and
//!   blocking ("sleepy") acquisition
//! - [`RtList`]: doubly-linked list over a pool, O(1) splice between lists of
//!   the same pool
//! - [`DeferredQueue`] / [`RtInbox`]: audio ↔ control hand-off built from two lists

mod deferred;
mod list;
mod pool;

pub use deferred::{
    deferred_queue, rt_inbox, DeferredQueue, DeferredReceiver, RtInbox, RtInboxSender,
};
pub use list::{Iter, RtList};
pub use pool::{PoolId, RtMemoryPool};
