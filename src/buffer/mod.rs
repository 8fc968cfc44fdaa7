//! The segmented ring buffer.

mod iter;
mod lifecycle;
mod reconfigure;

use std::fmt;
use std::ops::{Index, IndexMut};

use tracing::debug;

use crate::core::clear::{ClearHandler, NoopClear};
use crate::core::config::{BufferConfig, Geometry};
use crate::core::index::RingIndex;
use crate::core::segment::SegmentTable;
use crate::error::{Result, RingBufferError};

pub use iter::Iter;

/// Bounded, double-ended ring buffer with index based access.
///
/// The addressable capacity (`segment_size * segment_count`) is split into
/// segments that are allocated on first write and freed once the live range
/// has moved away from them. Elements are never moved in memory while they
/// are live, so a pointer taken from [`back`](Self::back) after a push stays
/// valid until that element is evicted, popped, or the segment size changes.
///
/// When the buffer holds `max_size()` elements, pushing at one end evicts
/// the element at the other end.
///
/// Vacated slots keep their value; the clear handler `C` decides whether to
/// reset it (see [`crate::core::clear`]).
pub struct LargeRingBuffer<T, C = NoopClear>
where
    C: ClearHandler<T>,
{
    segments: SegmentTable<T>,
    index: RingIndex,
    segment_size: usize,
    max_items: usize,
    fixed_segment_allocation: bool,
    preallocate: bool,
    clear_handler: C,
}

impl<T: Default, C: ClearHandler<T> + Default> Default for LargeRingBuffer<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default, C: ClearHandler<T> + Default> LargeRingBuffer<T, C> {
    /// Creates a buffer with zero capacity. Configure it with
    /// [`change_configuration`](Self::change_configuration) or
    /// [`discard_and_change_configuration`](Self::discard_and_change_configuration).
    pub fn new() -> Self {
        Self::with_handler(C::default())
    }

    /// Creates a buffer for `max_items` elements with an automatically chosen
    /// segment size.
    pub fn with_max_items(max_items: usize) -> Self {
        let mut buffer = Self::new();
        buffer.install(Geometry::for_max_items::<T>(max_items, 0), false, false);
        buffer
    }

    /// Creates a buffer of `segment_count` segments holding `segment_size` elements each.
    ///
    /// A zero in either dimension yields a buffer with zero capacity. Use
    /// [`from_config`](Self::from_config) to get the overflow as an error.
    ///
    /// # Panics
    /// Panics if `segment_count * segment_size` overflows `usize`.
    pub fn with_geometry(segment_count: usize, segment_size: usize) -> Self {
        let mut buffer = Self::new();
        match BufferConfig::with_geometry(segment_count, segment_size).resolve::<T>() {
            Ok(geometry) => buffer.install(geometry, false, false),
            Err(err) => panic!("{err}"),
        }
        buffer
    }

    /// Creates a buffer from a full configuration.
    ///
    /// # Errors
    /// Returns `RingBufferError::InvalidConfiguration` if an explicit geometry
    /// cannot hold `max_items`.
    pub fn from_config(config: &BufferConfig) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.discard_and_apply(config)?;
        Ok(buffer)
    }
}

impl<T: Default, C: ClearHandler<T>> LargeRingBuffer<T, C> {
    /// Creates an unconfigured buffer using `clear_handler`.
    pub fn with_handler(clear_handler: C) -> Self {
        Self {
            segments: SegmentTable::default(),
            index: RingIndex::default(),
            segment_size: 0,
            max_items: 0,
            fixed_segment_allocation: false,
            preallocate: false,
            clear_handler,
        }
    }

    /// Creates a buffer from `config` using `clear_handler`.
    ///
    /// # Errors
    /// Returns `RingBufferError::InvalidConfiguration` if an explicit geometry
    /// cannot hold `max_items`.
    pub fn from_config_with_handler(config: &BufferConfig, clear_handler: C) -> Result<Self> {
        let mut buffer = Self::with_handler(clear_handler);
        buffer.discard_and_apply(config)?;
        Ok(buffer)
    }

    /// Replaces the clear handler, keeping contents and configuration.
    pub fn with_clear_handler<D: ClearHandler<T>>(self, clear_handler: D) -> LargeRingBuffer<T, D> {
        LargeRingBuffer {
            segments: self.segments,
            index: self.index,
            segment_size: self.segment_size,
            max_items: self.max_items,
            fixed_segment_allocation: self.fixed_segment_allocation,
            preallocate: self.preallocate,
            clear_handler,
        }
    }

    /// Adds an element at the back and returns it for in-place construction.
    ///
    /// The slot may still hold a value from earlier use, depending on the
    /// clear handler. When the buffer is full the front element is evicted.
    ///
    /// # Panics
    /// Panics if the buffer has zero capacity.
    pub fn extend_back(&mut self) -> &mut T {
        assert!(self.max_items > 0, "extend_back on a ring buffer with zero capacity");
        if self.index.len() == self.max_items {
            if self.max_items == self.index.capacity() {
                // The front slot becomes the new back slot.
                let pos = self.index.start();
                self.clear_slot(pos);
                self.index.rotate_forward();
                return self.slot_mut(pos);
            }
            self.pop_front();
        }
        let pos = self.index.push_back();
        self.slot_mut(pos)
    }

    /// Adds an element at the front and returns it for in-place construction.
    ///
    /// When the buffer is full the back element is evicted.
    ///
    /// # Panics
    /// Panics if the buffer has zero capacity.
    pub fn extend_front(&mut self) -> &mut T {
        assert!(self.max_items > 0, "extend_front on a ring buffer with zero capacity");
        if self.index.len() == self.max_items {
            if self.max_items == self.index.capacity() {
                // The back slot becomes the new front slot.
                let pos = self.index.before_end();
                self.clear_slot(pos);
                self.index.rotate_backward();
                return self.slot_mut(pos);
            }
            self.pop_back();
        }
        let pos = self.index.push_front();
        self.slot_mut(pos)
    }

    /// Appends `item`, evicting the front element if the buffer is full.
    ///
    /// # Panics
    /// Panics if the buffer has zero capacity.
    #[inline]
    pub fn push_back(&mut self, item: T) {
        *self.extend_back() = item;
    }

    /// Prepends `item`, evicting the back element if the buffer is full.
    ///
    /// # Panics
    /// Panics if the buffer has zero capacity.
    #[inline]
    pub fn push_front(&mut self, item: T) {
        *self.extend_front() = item;
    }

    /// Drains all elements through the clear handler and frees every segment
    /// unless fixed segment allocation is enabled. The configuration is kept.
    pub fn clear(&mut self) {
        let count = self.len();
        for _ in 0..count {
            self.pop_front();
        }
        if !self.fixed_segment_allocation {
            self.segments.release_all();
        }
        self.index.reset();
        debug!(cleared = count, "cleared ring buffer");
    }
}

impl<T, C: ClearHandler<T>> LargeRingBuffer<T, C> {
    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns true when `max_size()` elements are stored.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.max_items > 0 && self.index.len() == self.max_items
    }

    /// Maximum number of live elements.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_items
    }

    #[inline]
    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of segments currently backed by memory.
    pub fn used_segments(&self) -> usize {
        self.segments.allocated()
    }

    #[inline]
    pub fn fixed_segment_allocation(&self) -> bool {
        self.fixed_segment_allocation
    }

    /// Whether the last applied configuration asked for every segment up front.
    #[inline]
    pub fn preallocate(&self) -> bool {
        self.preallocate
    }

    /// Addressable slots, `segment_size() * segment_count()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> BufferConfig {
        BufferConfig {
            segment_count: self.segment_count(),
            segment_size: self.segment_size,
            max_items: self.max_items,
            fixed_segment_allocation: self.fixed_segment_allocation,
            preallocate: self.preallocate,
        }
    }

    /// Returns the element at logical position `index`.
    ///
    /// # Errors
    /// Returns `RingBufferError::IndexOutOfRange` if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T> {
        self.check_index(index)?;
        Ok(self.slot(self.index.physical(index)))
    }

    /// Mutable variant of [`at`](Self::at).
    ///
    /// # Errors
    /// Returns `RingBufferError::IndexOutOfRange` if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        self.check_index(index)?;
        let pos = self.index.physical(index);
        Ok(self.slot_mut_existing(pos))
    }

    /// Returns the element at `index`, or `None` if it is out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.at(index).ok()
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.at_mut(index).ok()
    }

    /// First element. Calling this on an empty buffer is a logic error: it
    /// returns a stale slot or panics.
    #[inline]
    pub fn front(&self) -> &T {
        debug_assert!(!self.is_empty(), "front on an empty ring buffer");
        self.slot(self.index.start())
    }

    #[inline]
    pub fn front_mut(&mut self) -> &mut T {
        debug_assert!(!self.is_empty(), "front_mut on an empty ring buffer");
        let pos = self.index.start();
        self.slot_mut_existing(pos)
    }

    /// Last element. Calling this on an empty buffer is a logic error: it
    /// returns a stale slot or panics.
    #[inline]
    pub fn back(&self) -> &T {
        debug_assert!(!self.is_empty(), "back on an empty ring buffer");
        self.slot(self.index.before_end())
    }

    #[inline]
    pub fn back_mut(&mut self) -> &mut T {
        debug_assert!(!self.is_empty(), "back_mut on an empty ring buffer");
        let pos = self.index.before_end();
        self.slot_mut_existing(pos)
    }

    /// Removes the front element, passing it to the clear handler.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    pub fn pop_front(&mut self) {
        assert!(!self.is_empty(), "pop_front on an empty ring buffer");
        let pos = self.index.start();
        self.clear_slot(pos);
        self.index.pop_front();
        if self.is_segment_start(self.index.start()) {
            self.remove_unused_segments_front();
        }
    }

    /// Removes the back element, passing it to the clear handler.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    pub fn pop_back(&mut self) {
        assert!(!self.is_empty(), "pop_back on an empty ring buffer");
        let pos = self.index.before_end();
        self.clear_slot(pos);
        self.index.pop_back();
        if self.is_segment_start(self.index.end()) {
            self.remove_unused_segments_back();
        }
    }

    /// Drops all elements and segments and resets the buffer to zero
    /// capacity. The clear handler is not called.
    pub fn discard(&mut self) {
        debug!(dropped = self.len(), "discarded ring buffer");
        self.segments = SegmentTable::default();
        self.index = RingIndex::default();
        self.segment_size = 0;
        self.max_items = 0;
        self.fixed_segment_allocation = false;
        self.preallocate = false;
    }

    /// Iterates over the live elements from front to back.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::new(self)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(RingBufferError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Splits a physical position into `(segment, offset)`.
    #[inline]
    fn locate(&self, pos: usize) -> (usize, usize) {
        (pos / self.segment_size, pos % self.segment_size)
    }

    #[inline]
    fn is_segment_start(&self, pos: usize) -> bool {
        pos % self.segment_size == 0
    }

    #[inline]
    fn slot(&self, pos: usize) -> &T {
        let (segment, offset) = self.locate(pos);
        self.segments.slot(segment, offset)
    }

    /// Mutable slot that must already be allocated (it holds a live element).
    #[inline]
    fn slot_mut_existing(&mut self, pos: usize) -> &mut T {
        let (segment, offset) = self.locate(pos);
        self.segments.slot_mut(segment, offset)
    }

    fn clear_slot(&mut self, pos: usize) {
        let (segment, offset) = self.locate(pos);
        let item = self.segments.slot_mut(segment, offset);
        self.clear_handler.clear(item);
    }
}

impl<T: Default, C: ClearHandler<T>> LargeRingBuffer<T, C> {
    /// Mutable slot, allocating its segment on first write.
    #[inline]
    fn slot_mut(&mut self, pos: usize) -> &mut T {
        let (segment, offset) = self.locate(pos);
        &mut self.segments.ensure(segment, self.segment_size)[offset]
    }
}

impl<T, C: ClearHandler<T>> Index<usize> for LargeRingBuffer<T, C> {
    type Output = T;

    /// Unchecked access: `index < len()` is the caller's responsibility.
    /// Out-of-range indices return a stale slot or panic.
    #[inline]
    fn index(&self, index: usize) -> &T {
        debug_assert!(index < self.len(), "ring buffer index {index} out of range");
        self.slot(self.index.physical(index))
    }
}

impl<T, C: ClearHandler<T>> IndexMut<usize> for LargeRingBuffer<T, C> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len(), "ring buffer index {index} out of range");
        let pos = self.index.physical(index);
        self.slot_mut_existing(pos)
    }
}

impl<T: Default, C: ClearHandler<T>> Extend<T> for LargeRingBuffer<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T, C: ClearHandler<T>> IntoIterator for &'a LargeRingBuffer<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug, C: ClearHandler<T>> fmt::Debug for LargeRingBuffer<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clear::AssignDefault;

    #[test]
    fn test_defaults() {
        let mut rb = LargeRingBuffer::<i32>::new();
        assert!(rb.is_empty());
        assert!(!rb.is_full());
        assert_eq!(rb.len(), 0);
        assert_eq!(rb.max_size(), 0);
        assert_eq!(rb.segment_size(), 0);
        assert_eq!(rb.segment_count(), 0);
        assert_eq!(rb.used_segments(), 0);
        assert!(!rb.fixed_segment_allocation());
        rb.clear();
        assert!(rb.is_empty());
    }

    #[test]
    fn test_single_slot_back() {
        let mut rb = LargeRingBuffer::<i32>::with_geometry(1, 1);
        assert_eq!(rb.max_size(), 1);
        rb.push_back(1);
        assert!(rb.is_full());
        assert_eq!((*rb.front(), *rb.back()), (1, 1));
        rb.push_back(2);
        assert_eq!(rb.len(), 1);
        assert_eq!((*rb.front(), *rb.back()), (2, 2));
        rb.pop_back();
        assert!(rb.is_empty());
        rb.push_back(1);
        assert_eq!(rb[0], 1);
        assert_eq!(rb.at(2), Err(RingBufferError::IndexOutOfRange { index: 2, len: 1 }));
    }

    #[test]
    fn test_extend_returns_slot_for_in_place_write() {
        let mut rb = LargeRingBuffer::<i32>::with_geometry(3, 2);
        *rb.extend_back() = 1;
        *rb.extend_front() = 0;
        rb.extend_back();
        assert_eq!(rb.len(), 3);
        assert_eq!(rb.iter().copied().collect::<Vec<_>>(), vec![0, 1, 0]);
    }

    #[test]
    fn test_partial_ceiling_evicts_opposite_end() {
        // capacity 16, ceiling 10
        let mut rb = LargeRingBuffer::<usize>::from_config(
            &BufferConfig::with_geometry(8, 2).max_items(10),
        )
        .unwrap();
        for i in 0..25 {
            rb.push_back(i);
            assert!(rb.len() <= 10);
        }
        assert!(rb.is_full());
        assert_eq!(*rb.front(), 15);
        assert_eq!(*rb.back(), 24);

        rb.push_front(100);
        assert_eq!(rb.len(), 10);
        assert_eq!(*rb.front(), 100);
        assert_eq!(*rb.back(), 23);
    }

    #[test]
    fn test_with_clear_handler_keeps_contents() {
        let mut rb = LargeRingBuffer::<u8>::with_geometry(2, 2);
        rb.extend([1, 2, 3]);
        let mut rb = rb.with_clear_handler(AssignDefault);
        assert_eq!(rb.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        rb.pop_front();
        // The vacated slot was reset in place.
        assert_eq!(*rb.segments.slot(0, 0), 0);
        assert_eq!(rb.len(), 2);
    }

    #[test]
    fn test_debug_lists_live_elements() {
        let mut rb = LargeRingBuffer::<u8>::with_max_items(4);
        rb.extend([1, 2, 3, 4, 5]);
        assert_eq!(format!("{:?}", rb), "[2, 3, 4, 5]");
    }

    #[test]
    #[should_panic(expected = "zero capacity")]
    fn test_push_into_zero_capacity_panics() {
        let mut rb = LargeRingBuffer::<u8>::new();
        rb.push_back(1);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_with_geometry_overflow_panics() {
        let _ = LargeRingBuffer::<u8>::with_geometry(usize::MAX, 2);
    }

    #[test]
    fn test_config_snapshot_keeps_preallocate() {
        let config = BufferConfig::with_max_items(50).with_preallocate(true);
        let mut rb = LargeRingBuffer::<u8>::from_config(&config).unwrap();
        assert!(rb.preallocate());
        assert!(rb.config().preallocate);

        rb.change_configuration(30, false, false);
        assert!(!rb.config().preallocate);
        rb.discard();
        assert!(!rb.preallocate());
    }

    #[test]
    #[should_panic(expected = "empty ring buffer")]
    fn test_pop_empty_panics() {
        let mut rb = LargeRingBuffer::<u8>::with_max_items(4);
        rb.pop_front();
    }
}
