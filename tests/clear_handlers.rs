//! When and how vacated slots are handed to the clear handler.

mod common;

use std::cell::Cell;

use common::{RecordingClear, CLEARED};
use large_ring_buffer::{
    AssignDefault, BufferConfig, ClearFn, ClearHandler, ClearableClear, LargeRingBuffer, NoopClear,
};

type Recorded = LargeRingBuffer<u64, RecordingClear>;

fn strings<C: ClearHandler<String>>(rb: &LargeRingBuffer<String, C>) -> Vec<&str> {
    rb.iter().map(String::as_str).collect()
}

#[test]
fn test_noop_clear_leaves_stale_values() {
    let mut rb = LargeRingBuffer::<String, NoopClear>::with_geometry(1, 4);
    for s in ["a", "b", "c", "d"] {
        rb.push_back(s.to_string());
    }
    rb.pop_front();
    assert_eq!(rb.extend_back(), "a");
    assert_eq!(strings(&rb), ["b", "c", "d", "a"]);
}

#[test]
fn test_item_clear() {
    let mut rb = LargeRingBuffer::<String, ClearableClear>::with_geometry(1, 4);
    for s in ["a", "b", "c", "d"] {
        rb.push_back(s.to_string());
    }
    rb.pop_front();
    assert_eq!(strings(&rb), ["b", "c", "d"]);
    assert_eq!(rb.extend_back(), "");
    *rb.back_mut() = "e".to_string();

    // full: the evicted front slot comes back cleared
    assert_eq!(rb.extend_back(), "");
    assert_eq!(strings(&rb), ["c", "d", "e", ""]);

    rb.pop_back();
    rb.pop_back();
    assert_eq!(strings(&rb), ["c", "d"]);
    assert_eq!(rb.extend_front(), "");
}

#[test]
fn test_item_clear_keeps_allocation() {
    let mut rb = LargeRingBuffer::<Vec<u8>, ClearableClear>::with_geometry(1, 2);
    rb.push_back(Vec::with_capacity(256));
    rb.back_mut().extend_from_slice(b"payload");
    rb.pop_back();

    let slot = rb.extend_back();
    assert!(slot.is_empty());
    assert!(slot.capacity() >= 256);
}

#[test]
fn test_default_clear() {
    let mut rb = LargeRingBuffer::<String, AssignDefault>::with_geometry(1, 4);
    rb.push_back(String::with_capacity(64) + "a");
    for s in ["b", "c", "d"] {
        rb.push_back(s.to_string());
    }
    rb.pop_front();
    let slot = rb.extend_back();
    assert_eq!(slot, "");
    assert_eq!(slot.capacity(), 0);

    *rb.extend_front() = "x".to_string();
    assert_eq!(strings(&rb), ["x", "b", "c", "d"]);
}

#[test]
fn test_handler_sees_every_vacated_element_once() {
    let handler = RecordingClear::default();
    let mut rb =
        Recorded::from_config_with_handler(&BufferConfig::with_geometry(3, 2), handler.clone())
            .unwrap();
    rb.extend(0..6);
    assert!(handler.cleared.borrow().is_empty());

    rb.push_back(6);
    rb.push_front(100);
    assert_eq!(*handler.cleared.borrow(), [0, 6]);

    rb.pop_front();
    rb.pop_back();
    assert_eq!(rb.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);

    rb.clear();
    assert_eq!(*handler.cleared.borrow(), [0, 6, 100, 5, 1, 2, 3, 4]);
    assert!(rb.is_empty());

    rb.extend(10..13);
    rb.discard();
    drop(rb);
    assert_eq!(handler.cleared.borrow().len(), 8);
}

#[test]
fn test_handler_on_partial_ceiling_eviction() {
    let handler = RecordingClear::default();
    let config = BufferConfig::with_geometry(4, 2).max_items(6);
    let mut rb = Recorded::from_config_with_handler(&config, handler.clone()).unwrap();
    rb.extend(0..8);
    assert_eq!(*handler.cleared.borrow(), [0, 1]);

    rb.push_front(50);
    assert_eq!(*handler.cleared.borrow(), [0, 1, 7]);
    assert_eq!(rb.iter().copied().collect::<Vec<_>>(), [50, 2, 3, 4, 5, 6]);
}

#[test]
fn test_shrinking_reconfiguration_clears_dropped_tail() {
    let handler = RecordingClear::default();
    let mut rb =
        Recorded::from_config_with_handler(&BufferConfig::with_max_items(30), handler.clone())
            .unwrap();
    rb.extend(0..25);

    rb.change_configuration(20, false, false);
    assert_eq!(*handler.cleared.borrow(), [24, 23, 22, 21, 20]);
    assert_eq!(rb.len(), 20);
    assert!(rb.iter().all(|&v| v != CLEARED));

    // growing never clears
    rb.change_configuration(40, false, false);
    assert_eq!(handler.cleared.borrow().len(), 5);
}

#[test]
fn test_closure_clear_handler() {
    let calls = Cell::new(0);
    let mut rb = LargeRingBuffer::<u32>::with_geometry(2, 2).with_clear_handler(ClearFn(
        |item: &mut u32| {
            calls.set(calls.get() + 1);
            *item = 0;
        },
    ));
    rb.extend(1..=6);
    assert_eq!(calls.get(), 2);
    rb.clear();
    assert_eq!(calls.get(), 6);
}
