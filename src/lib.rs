#![forbid(unsafe_code)]
//! Large ring buffer built from lazily allocated segments.
//!
//! `large_ring_buffer` stores a bounded, continuously changing stream of
//! elements (log records, samples, events) with index based access from
//! both ends. The capacity is split into fixed-size segments that are
//! allocated on first write and released once the live range has moved on,
//! so memory follows the number of stored elements rather than the
//! configured maximum. Live elements never move in memory.
//!
//! # Quick Start
//!
//! ```
//! use large_ring_buffer::LargeRingBuffer;
//!
//! // Room for 200 log lines, 10 per segment.
//! let mut log: LargeRingBuffer<String> = LargeRingBuffer::with_max_items(200);
//! assert_eq!(log.segment_size(), 10);
//! assert_eq!(log.used_segments(), 0);
//!
//! for i in 0..250 {
//!     log.push_back(format!("line {}", i));
//! }
//! // The oldest 50 lines were evicted.
//! assert_eq!(log.len(), 200);
//! assert_eq!(log[0], "line 50");
//! assert_eq!(log.back(), "line 249");
//! assert!(log.at(200).is_err());
//! ```
//!
//! # Clear handlers
//!
//! Popped and evicted slots stay constructed for reuse. A clear handler
//! decides what happens to the old value:
//!
//! ```
//! use large_ring_buffer::{ClearableClear, LargeRingBuffer};
//!
//! let mut rb = LargeRingBuffer::<String, ClearableClear>::with_geometry(1, 4);
//! rb.push_back("first".to_string());
//! rb.push_back("second".to_string());
//! rb.pop_front();
//! assert_eq!(rb.len(), 1);
//! assert_eq!(rb.front(), "second");
//! ```
//!
//! # Reconfiguration
//!
//! ```
//! use large_ring_buffer::{BufferConfig, LargeRingBuffer};
//!
//! let config = BufferConfig::with_max_items(198)
//!     .with_fixed_segment_allocation(true)
//!     .with_preallocate(true);
//! let mut rb = LargeRingBuffer::<u64>::from_config(&config).unwrap();
//! rb.extend(0..105);
//! let front = rb.front() as *const u64;
//!
//! rb.change_configuration(145, true, true);
//! assert_eq!(rb.used_segments(), 15);
//! assert_eq!(rb.front() as *const u64, front);
//! ```

pub mod buffer;
pub mod core;
pub mod error;
pub mod io;

pub use buffer::{Iter, LargeRingBuffer};
pub use crate::core::clear::{AssignDefault, ClearFn, ClearHandler, Clearable, ClearableClear, NoopClear};
pub use crate::core::config::{BufferConfig, Geometry};
pub use error::{Result, RingBufferError};
