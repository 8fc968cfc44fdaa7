//! Error types for the large-ring-buffer crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RingBufferError>;

/// Errors that can occur when configuring or accessing a ring buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingBufferError {
    /// The requested item ceiling does not fit into the explicit segment geometry.
    #[error(
        "invalid configuration: {max_items} items exceed {segment_count} segments of {segment_size} slots"
    )]
    InvalidConfiguration {
        max_items: usize,
        segment_count: usize,
        segment_size: usize,
    },
    /// `segment_count * segment_size` does not fit into `usize`.
    #[error("capacity overflow: {segment_count} segments of {segment_size} slots")]
    CapacityOverflow {
        segment_count: usize,
        segment_size: usize,
    },
    /// Checked access past the live item count.
    #[error("ring buffer index out of range: index {index}, length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Malformed configuration document.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for RingBufferError {
    fn from(err: std::io::Error) -> Self {
        RingBufferError::IoError(err.to_string())
    }
}
