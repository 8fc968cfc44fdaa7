//! Circular index arithmetic over the buffer's physical slot space.

/// Start/end positions over `[0, capacity)` plus an explicit live count.
///
/// `end` is one past the last live slot. Keeping `len` separately avoids the
/// `start == end` ambiguity between an empty and a full ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingIndex {
    start: usize,
    end: usize,
    len: usize,
    capacity: usize,
}

impl RingIndex {
    /// Creates an empty index over `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Creates an index with `len` live slots starting at `start`.
    ///
    /// `start` must be below `capacity` and `len` at most `capacity`.
    pub fn from_parts(start: usize, len: usize, capacity: usize) -> Self {
        debug_assert!(len <= capacity);
        debug_assert!(capacity == 0 || start < capacity);
        let end = if capacity == 0 {
            0
        } else {
            (start + len) % capacity
        };
        Self {
            start,
            end,
            len,
            capacity,
        }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Physical slot of logical position `i`.
    #[inline]
    pub fn physical(&self, i: usize) -> usize {
        let pos = self.start + i;
        if pos >= self.capacity {
            pos - self.capacity
        } else {
            pos
        }
    }

    /// Physical slot of the last live element (the one before `end`).
    #[inline]
    pub fn before_end(&self) -> usize {
        self.prev(self.end)
    }

    /// Claims the slot at `end`, returning it.
    #[inline]
    pub fn push_back(&mut self) -> usize {
        let pos = self.end;
        self.end = self.next(self.end);
        self.len += 1;
        pos
    }

    /// Claims the slot before `start`, returning it.
    #[inline]
    pub fn push_front(&mut self) -> usize {
        self.start = self.prev(self.start);
        self.len += 1;
        self.start
    }

    /// Releases the slot before `end`, returning it.
    #[inline]
    pub fn pop_back(&mut self) -> usize {
        debug_assert!(self.len > 0);
        self.end = self.prev(self.end);
        self.len -= 1;
        self.end
    }

    /// Releases the slot at `start`, returning it.
    #[inline]
    pub fn pop_front(&mut self) -> usize {
        debug_assert!(self.len > 0);
        let pos = self.start;
        self.start = self.next(self.start);
        self.len -= 1;
        pos
    }

    /// Moves both ends forward by one slot; the live count is unchanged.
    #[inline]
    pub fn rotate_forward(&mut self) {
        self.start = self.next(self.start);
        self.end = self.next(self.end);
    }

    /// Moves both ends backward by one slot; the live count is unchanged.
    #[inline]
    pub fn rotate_backward(&mut self) {
        self.start = self.prev(self.start);
        self.end = self.prev(self.end);
    }

    /// Empties the index and points both ends at slot 0.
    pub fn reset(&mut self) {
        self.start = 0;
        self.end = 0;
        self.len = 0;
    }

    #[inline]
    fn next(&self, pos: usize) -> usize {
        debug_assert!(self.capacity > 0);
        let pos = pos + 1;
        if pos == self.capacity {
            0
        } else {
            pos
        }
    }

    #[inline]
    fn prev(&self, pos: usize) -> usize {
        debug_assert!(self.capacity > 0);
        if pos == 0 {
            self.capacity - 1
        } else {
            pos - 1
        }
    }
}
