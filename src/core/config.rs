//! Buffer configuration and segment geometry derivation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RingBufferError};

/// Segment size used when the geometry is derived from an item ceiling alone.
pub const DEFAULT_SEGMENT_SIZE: usize = 10;

/// Upper bound in bytes for a single auto-sized segment.
pub const MAX_AUTO_SEGMENT_BYTES: usize = 1024 * 1024;

/// Segment size ladder: `(min_items, segment_size)`, checked from largest to smallest.
const SEGMENT_SIZE_LADDER: [(usize, usize); 3] =
    [(100_000_000, 10_000), (1_000_000, 1_000), (10_000, 100)];

/// User-facing buffer configuration.
///
/// A zero `segment_count` or `segment_size` means "derive it". When both are
/// zero the segment size is picked from a fixed ladder based on `max_items`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Number of segments (0 = derive).
    #[serde(default)]
    pub segment_count: usize,
    /// Slots per segment (0 = derive).
    #[serde(default)]
    pub segment_size: usize,
    /// Maximum number of live items (0 = full capacity when the geometry is explicit).
    #[serde(default)]
    pub max_items: usize,
    /// Keep segments allocated once created; only explicit resets free them.
    #[serde(default)]
    pub fixed_segment_allocation: bool,
    /// Allocate every segment up front.
    #[serde(default)]
    pub preallocate: bool,
}

impl BufferConfig {
    /// Configuration that derives the whole geometry from an item ceiling.
    pub fn with_max_items(max_items: usize) -> Self {
        Self {
            max_items,
            ..Self::default()
        }
    }

    /// Configuration with explicit geometry; the ceiling defaults to full capacity.
    pub fn with_geometry(segment_count: usize, segment_size: usize) -> Self {
        Self {
            segment_count,
            segment_size,
            ..Self::default()
        }
    }

    /// Set the live item ceiling.
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Enable or disable fixed segment allocation.
    pub fn with_fixed_segment_allocation(mut self, fixed: bool) -> Self {
        self.fixed_segment_allocation = fixed;
        self
    }

    /// Enable or disable eager segment allocation.
    pub fn with_preallocate(mut self, preallocate: bool) -> Self {
        self.preallocate = preallocate;
        self
    }

    /// Derives a consistent geometry for elements of type `T`.
    ///
    /// # Errors
    /// Returns `RingBufferError::InvalidConfiguration` if an explicit geometry
    /// cannot hold `max_items`, and `RingBufferError::CapacityOverflow` if the
    /// capacity does not fit into `usize`.
    pub fn resolve<T>(&self) -> Result<Geometry> {
        let max_items = self.max_items;
        match (self.segment_count, self.segment_size) {
            (0, 0) => Ok(Geometry::for_max_items::<T>(max_items, 0)),
            (0, segment_size) => Ok(Geometry::for_max_items::<T>(max_items, segment_size)
                .or_zero_if_empty(max_items)),
            (segment_count, 0) => {
                if max_items == 0 {
                    return Ok(Geometry::ZERO);
                }
                Ok(Geometry {
                    segment_size: max_items.div_ceil(segment_count),
                    segment_count,
                    max_items,
                })
            }
            (segment_count, segment_size) => {
                let capacity = segment_count.checked_mul(segment_size).ok_or(
                    RingBufferError::CapacityOverflow {
                        segment_count,
                        segment_size,
                    },
                )?;
                if max_items > capacity {
                    return Err(RingBufferError::InvalidConfiguration {
                        max_items,
                        segment_count,
                        segment_size,
                    });
                }
                Ok(Geometry {
                    segment_size,
                    segment_count,
                    max_items: if max_items == 0 { capacity } else { max_items },
                })
            }
        }
    }
}

/// Resolved segment geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub segment_size: usize,
    pub segment_count: usize,
    pub max_items: usize,
}

impl Geometry {
    /// Geometry of a buffer that cannot hold anything.
    pub const ZERO: Geometry = Geometry {
        segment_size: 0,
        segment_count: 0,
        max_items: 0,
    };

    /// Total addressable slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.segment_size * self.segment_count
    }

    /// Derives the segment count for `max_items`, keeping `segment_size` when it
    /// is non-zero and otherwise picking one with [`auto_segment_size`].
    ///
    /// A kept segment size survives a zero ceiling; this is what preserving
    /// reconfiguration relies on.
    pub fn for_max_items<T>(max_items: usize, segment_size: usize) -> Self {
        let segment_size = if segment_size == 0 {
            if max_items == 0 {
                return Self::ZERO;
            }
            auto_segment_size::<T>(max_items)
        } else {
            segment_size
        };
        Self {
            segment_size,
            segment_count: max_items.div_ceil(segment_size),
            max_items,
        }
    }

    fn or_zero_if_empty(self, max_items: usize) -> Self {
        if max_items == 0 {
            Self::ZERO
        } else {
            self
        }
    }
}

/// Picks a segment size for `max_items` elements of type `T`.
///
/// Escalates from 10 to 100, 1000 and 10000 slots as the ceiling crosses
/// 10^4, 10^6 and 10^8, unless a segment of the larger size would exceed
/// [`MAX_AUTO_SEGMENT_BYTES`].
pub fn auto_segment_size<T>(max_items: usize) -> usize {
    let item_bytes = std::mem::size_of::<T>();
    SEGMENT_SIZE_LADDER
        .iter()
        .find(|&&(threshold, size)| {
            max_items >= threshold && size.saturating_mul(item_bytes) <= MAX_AUTO_SEGMENT_BYTES
        })
        .map(|&(_, size)| size)
        .unwrap_or(DEFAULT_SEGMENT_SIZE)
}
