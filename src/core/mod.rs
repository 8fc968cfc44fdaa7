//! Building blocks of the ring buffer: configuration, index arithmetic,
//! segment storage and clear handlers.

pub mod clear;
pub mod config;
pub mod index;
pub(crate) mod segment;

pub use clear::{AssignDefault, ClearFn, ClearHandler, Clearable, ClearableClear, NoopClear};
pub use config::{auto_segment_size, BufferConfig, Geometry};
