//! Fixed-element-size memory pool usable from the audio thread.
//!
//! Storage is split into slabs of `min_preallocated` nodes. The first slab is
//! created up front; further slabs are only ever created from
//! [`RtMemoryPool::allocate_sleepy`] or [`RtMemoryPool::reserve`] (control
//! thread), never from [`RtMemoryPool::allocate_atomic`].
//!
//! Nodes are addressed by `u32` slot index. A slot index is owned by exactly one
//! party at a time: the free queue, or the list that popped it.

use crate::config::PoolConfig;
use crossbeam::queue::ArrayQueue;
use crossbeam::utils::Backoff;
use parking_lot::Mutex;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// Link value meaning "no node".
pub(crate) const NIL: u32 = u32::MAX;

/// How long a sleepy allocation waits for another thread to free a slot.
const SLEEPY_TIMEOUT: Duration = Duration::from_millis(100);

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity tag of a pool. Every list carries the tag of the pool it was built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(u64);

impl PoolId {
    fn next() -> Self {
        Self(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub(crate) struct Node<T> {
    pub(crate) prev: u32,
    pub(crate) next: u32,
    pub(crate) value: MaybeUninit<T>,
}

type Slot<T> = UnsafeCell<Node<T>>;

struct PoolInner<T> {
    id: PoolId,
    slab_size: usize,
    max_preallocated: usize,
    slabs: Box<[OnceLock<Box<[Slot<T>]>>]>,
    created: AtomicUsize,
    free: ArrayQueue<u32>,
    grow_lock: Mutex<()>,
}

// SAFETY: a slot is only dereferenced by the party that currently owns its
// index (see module docs). Ownership moves through the `ArrayQueue`, which
// provides the necessary happens-before edges. Slabs are published through
// `OnceLock` and never moved or freed while the pool is alive.
unsafe impl<T: Send> Sync for PoolInner<T> {}
// SAFETY: see above; values of type `T` may be dropped on another thread.
unsafe impl<T: Send> Send for PoolInner<T> {}

impl<T> PoolInner<T> {
    fn grow(&self) -> bool {
        let _guard = self.grow_lock.lock();

        let slab_index = self.created.load(Ordering::Acquire) / self.slab_size;
        if slab_index >= self.slabs.len() {
            return false;
        }

        let first = slab_index * self.slab_size;
        let count = self.slab_size.min(self.max_preallocated - first);

        let slab: Box<[Slot<T>]> = (0..self.slab_size)
            .map(|_| {
                UnsafeCell::new(Node {
                    prev: NIL,
                    next: NIL,
                    value: MaybeUninit::uninit(),
                })
            })
            .collect();

        if self.slabs[slab_index].set(slab).is_err() {
            return false;
        }

        self.created.store(first + count, Ordering::Release);

        for index in first..first + count {
            // Capacity covers every index, so this cannot fail.
            let pushed = self.free.push(index as u32);
            debug_assert!(pushed.is_ok());
        }

        tracing::debug!(
            pool = ?self.id,
            slab = slab_index,
            nodes = count,
            "realtime pool grew"
        );
        true
    }
}

/// Pre-allocated pool of list nodes carrying values of type `T`.
///
/// Cloning is cheap and yields a handle to the same pool (same [`PoolId`]).
pub struct RtMemoryPool<T> {
    inner: Arc<PoolInner<T>>,
}

impl<T> Clone for RtMemoryPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for RtMemoryPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RtMemoryPool")
            .field("id", &self.inner.id)
            .field("created", &self.created())
            .field("available", &self.available())
            .field("max", &self.inner.max_preallocated)
            .finish()
    }
}

impl<T> RtMemoryPool<T> {
    /// Create a pool holding `min_preallocated` nodes, growable to `max_preallocated`.
    ///
    /// `max_preallocated` is raised to `min_preallocated` if smaller, and both are
    /// capped so every slot index fits in a `u32` link.
    pub fn new(min_preallocated: usize, max_preallocated: usize) -> Self {
        let max_preallocated = max_preallocated
            .max(min_preallocated)
            .max(1)
            .min(NIL as usize);
        let slab_size = min_preallocated.clamp(1, max_preallocated);
        let slab_count = max_preallocated.div_ceil(slab_size);

        let inner = Arc::new(PoolInner {
            id: PoolId::next(),
            slab_size,
            max_preallocated,
            slabs: (0..slab_count).map(|_| OnceLock::new()).collect(),
            created: AtomicUsize::new(0),
            free: ArrayQueue::new(max_preallocated),
            grow_lock: Mutex::new(()),
        });

        if min_preallocated > 0 {
            inner.grow();
        }

        Self { inner }
    }

    pub fn from_config(config: &PoolConfig) -> Self {
        Self::new(config.min_preallocated, config.max_preallocated)
    }

    #[inline]
    pub fn id(&self) -> PoolId {
        self.inner.id
    }

    /// Upper bound on the number of nodes this pool will ever hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.max_preallocated
    }

    /// Nodes that currently have backing storage.
    #[inline]
    pub fn created(&self) -> usize {
        self.inner.created.load(Ordering::Acquire)
    }

    /// Nodes ready for a non-blocking allocation.
    #[inline]
    pub fn available(&self) -> usize {
        self.inner.free.len()
    }

    /// Grow until at least `nodes` have backing storage (or the maximum is reached).
    ///
    /// Control thread only.
    pub fn reserve(&self, nodes: usize) {
        while self.created() < nodes.min(self.capacity()) {
            if !self.inner.grow() {
                break;
            }
        }
    }

    /// Non-blocking acquisition. Safe to call from the audio thread; never grows.
    #[inline]
    pub(crate) fn allocate_atomic(&self) -> Option<u32> {
        self.inner.free.pop()
    }

    /// Blocking acquisition for the control thread.
    ///
    /// Grows the pool when it runs dry, then waits (bounded) for another
    /// thread to return a node once the maximum has been reached.
    pub(crate) fn allocate_sleepy(&self) -> Option<u32> {
        let backoff = Backoff::new();
        let mut deadline = None;

        loop {
            if let Some(index) = self.inner.free.pop() {
                return Some(index);
            }

            if self.inner.grow() {
                continue;
            }

            if backoff.is_completed() {
                let deadline = *deadline.get_or_insert_with(|| Instant::now() + SLEEPY_TIMEOUT);
                if Instant::now() >= deadline {
                    return None;
                }
                std::thread::sleep(Duration::from_micros(100));
            } else {
                backoff.snooze();
            }
        }
    }

    /// Return a node to the free queue. The node's value must already be moved out.
    #[inline]
    pub(crate) fn deallocate(&self, index: u32) {
        let pushed = self.inner.free.push(index);
        debug_assert!(pushed.is_ok(), "slot {index} returned twice");
    }

    /// Raw access to a node.
    ///
    /// # Safety
    /// `index` must have been handed out by this pool and the caller must own it.
    #[inline]
    pub(crate) unsafe fn node(&self, index: u32) -> *mut Node<T> {
        let index = index as usize;
        let slab = index / self.inner.slab_size;
        let offset = index % self.inner.slab_size;

        match self.inner.slabs[slab].get() {
            Some(slab) => slab[offset].get(),
            None => unreachable!("slot {index} handed out before its slab was created"),
        }
    }
}
