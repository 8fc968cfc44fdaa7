//! Lazily materialized fixed-size storage segments.

use tracing::trace;

/// Backing storage of one allocated segment.
///
/// Boxed so that the element addresses stay put when the table itself grows,
/// shrinks or is rebuilt.
pub type SegmentStorage<T> = Box<[T]>;

/// Ordered table of segments, each either vacant or holding exactly
/// `segment_size` constructed slots.
#[derive(Debug)]
pub struct SegmentTable<T> {
    segments: Vec<Option<SegmentStorage<T>>>,
}

impl<T> Default for SegmentTable<T> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
        }
    }
}

impl<T> SegmentTable<T> {
    /// Creates a table of `count` vacant segments.
    pub fn with_len(count: usize) -> Self {
        let mut segments = Vec::with_capacity(count);
        segments.resize_with(count, || None);
        Self { segments }
    }

    /// Number of segment positions (vacant or allocated).
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_allocated(&self, segment: usize) -> bool {
        self.segments[segment].is_some()
    }

    /// Number of allocated segments.
    pub fn allocated(&self) -> usize {
        self.segments.iter().filter(|s| s.is_some()).count()
    }

    /// Frees the storage of `segment`, dropping its slots.
    pub fn release(&mut self, segment: usize) {
        if self.segments[segment].take().is_some() {
            trace!(segment, "released ring buffer segment");
        }
    }

    /// Frees every segment while keeping the table length.
    pub fn release_all(&mut self) {
        for segment in self.segments.iter_mut() {
            *segment = None;
        }
    }

    /// Detaches the storage of `segment` without touching its slots.
    pub fn take(&mut self, segment: usize) -> Option<SegmentStorage<T>> {
        self.segments[segment].take()
    }

    /// Installs previously detached storage at `segment`.
    pub fn put(&mut self, segment: usize, storage: SegmentStorage<T>) {
        debug_assert!(self.segments[segment].is_none());
        self.segments[segment] = Some(storage);
    }

    /// Shared access to a slot of an allocated segment.
    ///
    /// # Panics
    /// Panics if the segment is vacant or `offset` is out of bounds.
    #[inline]
    pub fn slot(&self, segment: usize, offset: usize) -> &T {
        match &self.segments[segment] {
            Some(storage) => &storage[offset],
            None => panic!("ring buffer slot {offset} read from vacant segment {segment}"),
        }
    }

    /// Mutable access to a slot of an allocated segment.
    ///
    /// # Panics
    /// Panics if the segment is vacant or `offset` is out of bounds.
    #[inline]
    pub fn slot_mut(&mut self, segment: usize, offset: usize) -> &mut T {
        match &mut self.segments[segment] {
            Some(storage) => &mut storage[offset],
            None => panic!("ring buffer slot {offset} written in vacant segment {segment}"),
        }
    }
}

impl<T: Default> SegmentTable<T> {
    /// Allocates `segment` with `segment_size` default slots if it is vacant.
    #[inline]
    pub fn ensure(&mut self, segment: usize, segment_size: usize) -> &mut [T] {
        self.segments[segment].get_or_insert_with(|| {
            trace!(segment, segment_size, "allocated ring buffer segment");
            new_storage(segment_size)
        })
    }

    /// Allocates every vacant segment.
    pub fn preallocate(&mut self, segment_size: usize) {
        for segment in 0..self.segments.len() {
            self.ensure(segment, segment_size);
        }
    }
}

/// Builds the storage for one segment with default-constructed slots.
fn new_storage<T: Default>(segment_size: usize) -> SegmentStorage<T> {
    let mut slots = Vec::with_capacity(segment_size);
    slots.resize_with(segment_size, T::default);
    slots.into_boxed_slice()
}
