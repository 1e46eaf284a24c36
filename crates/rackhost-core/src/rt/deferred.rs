//! Cross-thread queues built from two [`RtList`]s sharing one pool.
//!
//! One list is private to the producing side, the other sits behind a mutex.
//! The audio thread only ever *tries* the mutex, so a busy control thread
//! costs it nothing but a deferred flush.

use super::list::RtList;
use super::pool::RtMemoryPool;
use crate::error::RtListError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Audio → control notifications.
///
/// The audio thread posts with [`DeferredQueue::post_rt`] and calls
/// [`DeferredQueue::try_flush`] once per callback; the control thread drains
/// through a [`DeferredReceiver`].
pub struct DeferredQueue<T> {
    pending: RtList<T>,
    shared: Arc<Mutex<RtList<T>>>,
}

/// Control-thread end of a [`DeferredQueue`].
pub struct DeferredReceiver<T> {
    shared: Arc<Mutex<RtList<T>>>,
}

impl<T> Clone for DeferredReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

pub fn deferred_queue<T>(pool: &RtMemoryPool<T>) -> (DeferredQueue<T>, DeferredReceiver<T>) {
    let shared = Arc::new(Mutex::new(RtList::new(pool)));
    let queue = DeferredQueue {
        pending: RtList::new(pool),
        shared: Arc::clone(&shared),
    };
    (queue, DeferredReceiver { shared })
}

impl<T> DeferredQueue<T> {
    /// Queue a notification. Returns false (and drops it) if the pool is exhausted.
    #[inline]
    pub fn post_rt(&mut self, value: T) -> bool {
        self.pending.append(value).is_ok()
    }

    /// Hand everything posted so far to the control thread, if the lock is free.
    ///
    /// Returns false when the control thread holds the lock; the pending
    /// notifications stay queued for the next callback.
    pub fn try_flush(&mut self) -> bool {
        if self.pending.is_empty() {
            return true;
        }
        match self.shared.try_lock() {
            Some(mut shared) => shared.splice_append(&mut self.pending).is_ok(),
            None => false,
        }
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop everything not yet flushed. Control thread only (reload).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.shared.lock().clear();
    }
}

impl<T> DeferredReceiver<T> {
    /// Take every flushed notification, in posting order.
    pub fn drain(&self) -> Vec<T> {
        let mut shared = self.shared.lock();
        let mut out = Vec::with_capacity(shared.len());
        while let Some(value) = shared.pop_first() {
            out.push(value);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Control → audio messages.
///
/// The control thread posts through an [`RtInboxSender`] (which may grow the
/// pool); the audio thread calls [`RtInbox::fetch`] at the start of a callback
/// and then pops from its private list.
pub struct RtInbox<T> {
    local: RtList<T>,
    shared: Arc<Mutex<RtList<T>>>,
}

pub struct RtInboxSender<T> {
    shared: Arc<Mutex<RtList<T>>>,
}

impl<T> Clone for RtInboxSender<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

pub fn rt_inbox<T>(pool: &RtMemoryPool<T>) -> (RtInboxSender<T>, RtInbox<T>) {
    let shared = Arc::new(Mutex::new(RtList::new(pool)));
    let inbox = RtInbox {
        local: RtList::new(pool),
        shared: Arc::clone(&shared),
    };
    (RtInboxSender { shared }, inbox)
}

impl<T> RtInboxSender<T> {
    pub fn post(&self, value: T) -> Result<(), RtListError> {
        self.shared.lock().append_sleepy(value)
    }
}

impl<T> RtInbox<T> {
    /// Move posted messages into the private list without blocking.
    pub fn fetch(&mut self) -> bool {
        match self.shared.try_lock() {
            Some(mut shared) => self.local.splice_append(&mut shared).is_ok(),
            None => false,
        }
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.local.pop_first()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.local.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }
}
