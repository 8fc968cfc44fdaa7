//! Segment release after pops.
//!
//! A segment is only freed once the live range has moved at least one full
//! segment past it: the segment adjacent to the boundary is kept so that a
//! range jittering by one element around a segment edge does not allocate
//! and free the same segment over and over.

use crate::core::clear::ClearHandler;

use super::LargeRingBuffer;

impl<T, C: ClearHandler<T>> LargeRingBuffer<T, C> {
    /// Only release when more than one segment's worth of slots is unused.
    fn can_remove_segments(&self) -> bool {
        !self.fixed_segment_allocation && self.capacity() - self.len() > self.segment_size
    }

    /// Called after `start` moved onto the first slot of a segment.
    ///
    /// Walks backwards from the segment before `start`, keeping the adjacent
    /// one and freeing further allocated segments until the segment holding
    /// `end` or a vacant segment is reached.
    pub(super) fn remove_unused_segments_front(&mut self) {
        if !self.can_remove_segments() {
            return;
        }
        let count = self.segments.len();
        let end_segment = self.index.end() / self.segment_size;
        let mut segment = prev_segment(self.index.start() / self.segment_size, count);
        if segment == end_segment || !self.segments.is_allocated(segment) {
            return;
        }
        segment = prev_segment(segment, count);
        while segment != end_segment && self.segments.is_allocated(segment) {
            self.segments.release(segment);
            segment = prev_segment(segment, count);
        }
    }

    /// Called after `end` moved onto the first slot of a segment.
    ///
    /// Mirror image of [`remove_unused_segments_front`](Self::remove_unused_segments_front),
    /// walking forwards from the segment after `end` towards `start`.
    pub(super) fn remove_unused_segments_back(&mut self) {
        if !self.can_remove_segments() {
            return;
        }
        let count = self.segments.len();
        let start_segment = self.index.start() / self.segment_size;
        let mut segment = next_segment(self.index.end() / self.segment_size, count);
        if segment == start_segment || !self.segments.is_allocated(segment) {
            return;
        }
        segment = next_segment(segment, count);
        while segment != start_segment && self.segments.is_allocated(segment) {
            self.segments.release(segment);
            segment = next_segment(segment, count);
        }
    }
}

#[inline]
fn prev_segment(segment: usize, count: usize) -> usize {
    if segment == 0 {
        count - 1
    } else {
        segment - 1
    }
}

#[inline]
fn next_segment(segment: usize, count: usize) -> usize {
    let segment = segment + 1;
    if segment == count {
        0
    } else {
        segment
    }
}
