#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use large_ring_buffer::{ClearHandler, LargeRingBuffer};

/// Asserts the buffer holds exactly `start..start + count` in order.
pub fn check_value_range<C: ClearHandler<usize>>(
    rb: &LargeRingBuffer<usize, C>,
    start: usize,
    count: usize,
) {
    assert_eq!(rb.len(), count, "length mismatch");
    for i in 0..count {
        assert_eq!(rb[i], start + i, "rb[{}]", i);
        assert_eq!(*rb.at(i).unwrap(), start + i, "rb.at({})", i);
    }
}

/// Asserts the buffer holds `start, start - 1, ...` for `count` items.
pub fn check_value_range_reverse<C: ClearHandler<usize>>(
    rb: &LargeRingBuffer<usize, C>,
    start: usize,
    count: usize,
) {
    assert_eq!(rb.len(), count, "length mismatch");
    for i in 0..count {
        assert_eq!(rb[i], start - i, "rb[{}]", i);
        assert_eq!(*rb.at(i).unwrap(), start - i, "rb.at({})", i);
    }
}

/// Mixes pushes, extends and pops at both ends over more than two laps of
/// the ring, then checks the surviving contents.
pub fn exercise_both_ends(rb: &mut LargeRingBuffer<usize>) {
    let max_value = 2 * rb.max_size() + rb.segment_size();
    for i in 0..max_value {
        rb.push_front(i);
        rb.pop_front();
        rb.push_back(i);
        *rb.extend_back() = i;
        rb.pop_back();
    }
    check_value_range(
        rb,
        rb.max_size() + rb.segment_size() + 1,
        rb.max_size() - 1,
    );
}

/// Pushes `offset` filler values, then `0..count`, then pops the filler
/// (and anything evicted) from the front so exactly `0..count` remains.
pub fn fill_with_offset(rb: &mut LargeRingBuffer<usize>, offset: usize, count: usize) {
    for _ in 0..offset {
        rb.push_back(42);
    }
    for i in 0..count {
        rb.push_back(i);
    }
    let surplus = rb.len() - count;
    for _ in 0..surplus {
        rb.pop_front();
    }
}

/// Clear handler that records every value it clears and marks it with `u64::MAX`.
#[derive(Clone, Default)]
pub struct RecordingClear {
    pub cleared: Rc<RefCell<Vec<u64>>>,
}

pub const CLEARED: u64 = u64::MAX;

impl ClearHandler<u64> for RecordingClear {
    fn clear(&mut self, item: &mut u64) {
        assert_ne!(*item, CLEARED, "slot cleared twice");
        self.cleared.borrow_mut().push(*item);
        *item = CLEARED;
    }
}
