//! Clear handlers invoked when a slot stops holding a live element.
//!
//! The ring buffer keeps vacated slots constructed so they can be reused
//! without reallocation. A clear handler decides what happens to the stale
//! value: nothing ([`NoopClear`]), a reset to `T::default()` ([`AssignDefault`]),
//! a call to the element's own `clear` ([`ClearableClear`]), or any closure
//! ([`ClearFn`]).
//!
//! Handlers run exactly once per live-to-vacated transition (pop, overwrite
//! eviction, shrinking reconfiguration, [`clear`](crate::LargeRingBuffer::clear)).
//! Discarding a buffer or dropping it never calls them.

use std::collections::{BTreeMap, HashMap, VecDeque};

/// Strategy applied to an element when it becomes unused.
pub trait ClearHandler<T> {
    fn clear(&mut self, item: &mut T);
}

/// Leaves vacated elements untouched (default).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopClear;

impl<T> ClearHandler<T> for NoopClear {
    #[inline]
    fn clear(&mut self, _item: &mut T) {}
}

/// Replaces vacated elements with `T::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignDefault;

impl<T: Default> ClearHandler<T> for AssignDefault {
    #[inline]
    fn clear(&mut self, item: &mut T) {
        *item = T::default();
    }
}

/// Types that can drop their contents while keeping their allocation.
pub trait Clearable {
    fn clear(&mut self);
}

impl Clearable for String {
    fn clear(&mut self) {
        String::clear(self);
    }
}

impl<U> Clearable for Vec<U> {
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<U> Clearable for VecDeque<U> {
    fn clear(&mut self) {
        VecDeque::clear(self);
    }
}

impl<K, V, S> Clearable for HashMap<K, V, S> {
    fn clear(&mut self) {
        HashMap::clear(self);
    }
}

impl<K, V> Clearable for BTreeMap<K, V> {
    fn clear(&mut self) {
        BTreeMap::clear(self);
    }
}

/// Calls [`Clearable::clear`] on vacated elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearableClear;

impl<T: Clearable> ClearHandler<T> for ClearableClear {
    #[inline]
    fn clear(&mut self, item: &mut T) {
        item.clear();
    }
}

/// Adapts a closure into a clear handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearFn<F>(pub F);

impl<T, F> ClearHandler<T> for ClearFn<F>
where
    F: FnMut(&mut T),
{
    #[inline]
    fn clear(&mut self, item: &mut T) {
        (self.0)(item)
    }
}
