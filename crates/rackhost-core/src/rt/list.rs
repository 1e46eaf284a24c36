//! Doubly-linked list whose nodes live in an [`RtMemoryPool`].
//!
//! The pool owns node storage, the list owns link topology. Two lists built on
//! the same pool can exchange their whole contents in O(1) with
//! [`RtList::splice_append`] / [`RtList::splice_insert`].

use super::pool::{Node, PoolId, RtMemoryPool, NIL};
use crate::error::RtListError;
use std::marker::PhantomData;

/// Pool-backed list. `&RtList<T>` hands out `&T`, so sharing a list across
/// threads requires `T: Sync`:
///
/// ```compile_fail
/// use rackhost_core::RtList;
/// use std::cell::Cell;
///
/// fn assert_sync<S: Sync>() {}
/// assert_sync::<RtList<Cell<u32>>>();
/// ```
pub struct RtList<T> {
    pool: RtMemoryPool<T>,
    head: u32,
    tail: u32,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> RtList<T> {
    pub fn new(pool: &RtMemoryPool<T>) -> Self {
        Self {
            pool: pool.clone(),
            head: NIL,
            tail: NIL,
            len: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn pool_id(&self) -> PoolId {
        self.pool.id()
    }

    #[inline]
    pub fn pool(&self) -> &RtMemoryPool<T> {
        &self.pool
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append without blocking. Audio-thread safe.
    ///
    /// Fails with [`RtListError::PoolExhausted`] when no node is free; the value is dropped.
    pub fn append(&mut self, value: T) -> Result<(), RtListError> {
        let index = self
            .pool
            .allocate_atomic()
            .ok_or(RtListError::PoolExhausted)?;
        self.link_back(index, value);
        Ok(())
    }

    /// Append, growing the pool or waiting for a free node. Control thread only.
    pub fn append_sleepy(&mut self, value: T) -> Result<(), RtListError> {
        let index = self
            .pool
            .allocate_sleepy()
            .ok_or(RtListError::PoolExhausted)?;
        self.link_back(index, value);
        Ok(())
    }

    /// Prepend without blocking. Audio-thread safe.
    pub fn insert(&mut self, value: T) -> Result<(), RtListError> {
        let index = self
            .pool
            .allocate_atomic()
            .ok_or(RtListError::PoolExhausted)?;
        self.link_front(index, value);
        Ok(())
    }

    /// Prepend, growing the pool or waiting for a free node. Control thread only.
    pub fn insert_sleepy(&mut self, value: T) -> Result<(), RtListError> {
        let index = self
            .pool
            .allocate_sleepy()
            .ok_or(RtListError::PoolExhausted)?;
        self.link_front(index, value);
        Ok(())
    }

    pub fn first(&self) -> Option<&T> {
        self.value_at(self.head)
    }

    pub fn last(&self) -> Option<&T> {
        self.value_at(self.tail)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let index = self.head;
        (index != NIL).then(|| self.unlink(index))
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let index = self.tail;
        (index != NIL).then(|| self.unlink(index))
    }

    /// Keep only the elements for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let mut index = self.head;
        while index != NIL {
            // SAFETY: `index` is linked into this list, so we own it.
            let (next, kept) = unsafe {
                let node = &*self.pool.node(index);
                (node.next, keep(node.value.assume_init_ref()))
            };
            if !kept {
                drop(self.unlink(index));
            }
            index = next;
        }
    }

    pub fn clear(&mut self) {
        while self.pop_first().is_some() {}
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            index: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Move every element of `source` to the back of `self`, leaving `source` empty.
    ///
    /// Both lists must be backed by the same pool.
    pub fn splice_append(&mut self, source: &mut RtList<T>) -> Result<(), RtListError> {
        self.check_same_pool(source)?;
        if source.is_empty() {
            return Ok(());
        }

        if self.is_empty() {
            self.head = source.head;
        } else {
            // SAFETY: both ends are owned by lists on this pool, and we hold
            // exclusive borrows of both lists.
            unsafe {
                (*self.pool.node(self.tail)).next = source.head;
                (*self.pool.node(source.head)).prev = self.tail;
            }
        }
        self.tail = source.tail;
        self.len += source.len;
        source.forget_nodes();
        Ok(())
    }

    /// Move every element of `source` to the front of `self`, leaving `source` empty.
    pub fn splice_insert(&mut self, source: &mut RtList<T>) -> Result<(), RtListError> {
        self.check_same_pool(source)?;
        if source.is_empty() {
            return Ok(());
        }

        if self.is_empty() {
            self.tail = source.tail;
        } else {
            // SAFETY: see `splice_append`.
            unsafe {
                (*self.pool.node(source.tail)).next = self.head;
                (*self.pool.node(self.head)).prev = source.tail;
            }
        }
        self.head = source.head;
        self.len += source.len;
        source.forget_nodes();
        Ok(())
    }

    fn check_same_pool(&self, other: &RtList<T>) -> Result<(), RtListError> {
        if self.pool_id() == other.pool_id() {
            Ok(())
        } else {
            Err(RtListError::PoolMismatch {
                left: self.pool_id(),
                right: other.pool_id(),
            })
        }
    }

    fn forget_nodes(&mut self) {
        self.head = NIL;
        self.tail = NIL;
        self.len = 0;
    }

    fn value_at(&self, index: u32) -> Option<&T> {
        if index == NIL {
            return None;
        }
        // SAFETY: linked nodes are owned by this list and initialized.
        unsafe { Some((*self.pool.node(index)).value.assume_init_ref()) }
    }

    fn link_back(&mut self, index: u32, value: T) {
        // SAFETY: `index` was just handed out by the pool, so nobody else holds it.
        unsafe {
            let node = &mut *self.pool.node(index);
            *node = Node {
                prev: self.tail,
                next: NIL,
                value: std::mem::MaybeUninit::new(value),
            };
            if self.tail != NIL {
                (*self.pool.node(self.tail)).next = index;
            }
        }
        if self.head == NIL {
            self.head = index;
        }
        self.tail = index;
        self.len += 1;
    }

    fn link_front(&mut self, index: u32, value: T) {
        // SAFETY: see `link_back`.
        unsafe {
            let node = &mut *self.pool.node(index);
            *node = Node {
                prev: NIL,
                next: self.head,
                value: std::mem::MaybeUninit::new(value),
            };
            if self.head != NIL {
                (*self.pool.node(self.head)).prev = index;
            }
        }
        if self.tail == NIL {
            self.tail = index;
        }
        self.head = index;
        self.len += 1;
    }

    fn unlink(&mut self, index: u32) -> T {
        // SAFETY: `index` is linked into this list; its value is initialized and
        // is moved out exactly once before the node goes back to the pool.
        let value = unsafe {
            let node = &mut *self.pool.node(index);
            let (prev, next) = (node.prev, node.next);

            if prev == NIL {
                self.head = next;
            } else {
                (*self.pool.node(prev)).next = next;
            }
            if next == NIL {
                self.tail = prev;
            } else {
                (*self.pool.node(next)).prev = prev;
            }

            node.prev = NIL;
            node.next = NIL;
            node.value.assume_init_read()
        };

        self.len -= 1;
        self.pool.deallocate(index);
        value
    }
}

impl<T> Drop for RtList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RtList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over an [`RtList`].
pub struct Iter<'a, T> {
    list: &'a RtList<T>,
    index: u32,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.index == NIL {
            return None;
        }
        // SAFETY: the list is borrowed for 'a, so its nodes stay linked and initialized.
        let node = unsafe { &*self.list.pool.node(self.index) };
        self.index = node.next;
        self.remaining -= 1;
        // SAFETY: see above.
        Some(unsafe { node.value.assume_init_ref() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RtList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
