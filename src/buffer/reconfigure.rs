//! Changing the capacity of a buffer, with or without keeping its contents.

use std::mem;

use tracing::debug;

use crate::core::clear::ClearHandler;
use crate::core::config::{BufferConfig, Geometry};
use crate::core::index::RingIndex;
use crate::core::segment::SegmentTable;
use crate::error::Result;

use super::LargeRingBuffer;

impl<T: Default, C: ClearHandler<T>> LargeRingBuffer<T, C> {
    /// Changes the item ceiling while keeping the stored elements.
    ///
    /// The segment size is kept (or derived automatically if the buffer was
    /// never configured) and the segment count follows from `max_items`.
    /// If fewer than `len()` items fit, elements are popped from the back
    /// through the clear handler first.
    ///
    /// Elements keep their addresses except when the live range and the
    /// segment holding the front element disagree about wrapping: either the
    /// range needs one segment more than the new table has (its back wraps into
    /// the front segment), or it did so in the old table and no longer has to.
    /// Then the elements at the back that share a segment with the front move,
    /// `start % segment_size + len - (live_segments - 1) * segment_size` of
    /// them, which is always fewer than `segment_size`.
    ///
    /// With `fixed_segment_allocation` (or `preallocate`), segments that were
    /// allocated but hold no live elements are reused for the new table.
    pub fn change_configuration(
        &mut self,
        max_items: usize,
        fixed_segment_allocation: bool,
        preallocate: bool,
    ) {
        let geometry = Geometry::for_max_items::<T>(max_items, self.segment_size);
        self.migrate(geometry, fixed_segment_allocation, preallocate);
    }

    /// Applies `config` while keeping the stored elements.
    ///
    /// A config without explicit geometry behaves like
    /// [`change_configuration`](Self::change_configuration). Changing the
    /// segment size moves every element into newly allocated segments.
    ///
    /// # Errors
    /// Returns `RingBufferError::InvalidConfiguration` if an explicit geometry
    /// cannot hold `max_items`. The buffer is left unchanged on error.
    pub fn reconfigure(&mut self, config: &BufferConfig) -> Result<()> {
        let geometry = if config.segment_count == 0 && config.segment_size == 0 {
            Geometry::for_max_items::<T>(config.max_items, self.segment_size)
        } else {
            config.resolve::<T>()?
        };
        self.migrate(geometry, config.fixed_segment_allocation, config.preallocate);
        Ok(())
    }

    /// Drops all elements and applies `segment_count * segment_size` as the
    /// new geometry. The clear handler is not called.
    ///
    /// A zero in either dimension yields a buffer with zero capacity.
    ///
    /// # Errors
    /// Returns `RingBufferError::CapacityOverflow` if the capacity does not
    /// fit into `usize`. The buffer is left unchanged on error.
    pub fn discard_and_change_configuration(
        &mut self,
        segment_count: usize,
        segment_size: usize,
    ) -> Result<()> {
        self.discard_and_apply(&BufferConfig::with_geometry(segment_count, segment_size))
    }

    /// Drops all elements and applies `config`. The clear handler is not called.
    ///
    /// # Errors
    /// Returns `RingBufferError::InvalidConfiguration` if an explicit geometry
    /// cannot hold `max_items`. The buffer is left unchanged on error.
    pub fn discard_and_apply(&mut self, config: &BufferConfig) -> Result<()> {
        let geometry = config.resolve::<T>()?;
        debug!(
            dropped = self.len(),
            segment_count = geometry.segment_count,
            segment_size = geometry.segment_size,
            max_items = geometry.max_items,
            "discarded ring buffer contents and applied new configuration"
        );
        self.install(
            geometry,
            config.fixed_segment_allocation,
            config.preallocate,
        );
        Ok(())
    }

    /// Replaces the segment table with an empty one for `geometry`.
    pub(super) fn install(&mut self, geometry: Geometry, fixed: bool, preallocate: bool) {
        let mut segments = SegmentTable::with_len(geometry.segment_count);
        if preallocate {
            segments.preallocate(geometry.segment_size);
        }
        self.segments = segments;
        self.index = RingIndex::new(geometry.capacity());
        self.segment_size = geometry.segment_size;
        self.max_items = geometry.max_items;
        self.fixed_segment_allocation = fixed;
        self.preallocate = preallocate;
    }

    fn migrate(&mut self, geometry: Geometry, fixed: bool, preallocate: bool) {
        while self.len() > geometry.max_items {
            self.pop_back();
        }

        debug!(
            len = self.len(),
            from_segments = self.segment_count(),
            to_segments = geometry.segment_count,
            from_segment_size = self.segment_size,
            to_segment_size = geometry.segment_size,
            max_items = geometry.max_items,
            "reconfiguring ring buffer"
        );

        if self.segment_size != 0 && geometry.segment_size == self.segment_size {
            self.transfer_segments(geometry, fixed || preallocate);
        } else {
            self.rebuild_segments(geometry);
        }
        if preallocate {
            self.segments.preallocate(geometry.segment_size);
        }
        self.max_items = geometry.max_items;
        self.fixed_segment_allocation = fixed;
        self.preallocate = preallocate;
    }

    /// Same segment size: moves the live segments' storage, starting with
    /// the one holding the front element, to positions `0..` of a new table.
    fn transfer_segments(&mut self, geometry: Geometry, keep_spares: bool) {
        let segment_size = self.segment_size;
        let len = self.len();
        let new_count = geometry.segment_count;
        let mut old = mem::take(&mut self.segments);
        let old_count = old.len();
        let mut table = SegmentTable::with_len(new_count);

        let offset = if len == 0 {
            0
        } else {
            self.index.start() % segment_size
        };
        if len > 0 {
            let first = self.index.start() / segment_size;
            let live = (offset + len).div_ceil(segment_size);
            let last = live - 1;
            // The live run can need one segment more than a table has when
            // its first and last segment share storage through the wrap.
            let old_wraps = live > old_count;
            let new_wraps = live > new_count;
            let direct = if old_wraps || new_wraps { last } else { live };
            for k in 0..direct {
                if let Some(storage) = old.take((first + k) % old_count) {
                    table.put(k, storage);
                }
            }

            let wrapped = offset + len - last * segment_size;
            if new_wraps && !old_wraps {
                // The tail's elements move into the free head of segment 0.
                let tail_segment = (first + last) % old_count;
                if let Some(mut tail) = old.take(tail_segment) {
                    let head = table.ensure(0, segment_size);
                    head[..wrapped].swap_with_slice(&mut tail[..wrapped]);
                    old.put(tail_segment, tail);
                }
            } else if old_wraps && !new_wraps {
                // Segment 0 held both ends; split the tail into its own segment.
                if let Some(mut head) = table.take(0) {
                    let tail = table.ensure(last, segment_size);
                    tail[..wrapped].swap_with_slice(&mut head[..wrapped]);
                    table.put(0, head);
                }
            }
        }

        if keep_spares {
            let mut spares = (0..old_count).filter_map(|segment| old.take(segment));
            for position in 0..new_count {
                if table.is_allocated(position) {
                    continue;
                }
                match spares.next() {
                    Some(storage) => table.put(position, storage),
                    None => break,
                }
            }
        }

        self.segments = table;
        self.segment_size = geometry.segment_size;
        self.index = RingIndex::from_parts(offset, len, geometry.capacity());
    }

    /// Different segment size: moves every element into fresh segments,
    /// front element first at slot 0.
    fn rebuild_segments(&mut self, geometry: Geometry) {
        let segment_size = geometry.segment_size;
        let len = self.len();
        let mut table = SegmentTable::with_len(geometry.segment_count);
        for i in 0..len {
            let pos = self.index.physical(i);
            let item = mem::take(self.slot_mut_existing(pos));
            table.ensure(i / segment_size, segment_size)[i % segment_size] = item;
        }
        self.segments = table;
        self.segment_size = segment_size;
        self.index = RingIndex::from_parts(0, len, geometry.capacity());
    }
}
