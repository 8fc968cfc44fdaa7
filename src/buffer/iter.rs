use std::iter::FusedIterator;

use crate::core::clear::ClearHandler;

use super::LargeRingBuffer;

/// Front-to-back iterator over the live elements of a [`LargeRingBuffer`].
pub struct Iter<'a, T, C: ClearHandler<T>> {
    buffer: &'a LargeRingBuffer<T, C>,
    front: usize,
    back: usize,
}

impl<'a, T, C: ClearHandler<T>> Iter<'a, T, C> {
    pub(super) fn new(buffer: &'a LargeRingBuffer<T, C>) -> Self {
        Self {
            buffer,
            front: 0,
            back: buffer.len(),
        }
    }
}

impl<'a, T, C: ClearHandler<T>> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let buffer = self.buffer;
        let item = &buffer[self.front];
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T, C: ClearHandler<T>> DoubleEndedIterator for Iter<'a, T, C> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        let buffer = self.buffer;
        Some(&buffer[self.back])
    }
}

impl<'a, T, C: ClearHandler<T>> ExactSizeIterator for Iter<'a, T, C> {}

impl<'a, T, C: ClearHandler<T>> FusedIterator for Iter<'a, T, C> {}

#[cfg(test)]
mod tests {
    use crate::LargeRingBuffer;

    #[test]
    fn iterates_in_logical_order_across_wrap() {
        let mut rb = LargeRingBuffer::<u32>::with_geometry(3, 2);
        rb.extend(0..9);
        let items: Vec<u32> = rb.iter().copied().collect();
        assert_eq!(items, vec![3, 4, 5, 6, 7, 8]);

        let reversed: Vec<u32> = rb.iter().rev().copied().collect();
        assert_eq!(reversed, vec![8, 7, 6, 5, 4, 3]);
    }

    #[test]
    fn exact_size_and_meeting_ends() {
        let mut rb = LargeRingBuffer::<u32>::with_max_items(20);
        rb.extend(0..5);
        let mut iter = rb.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.by_ref().count(), 3);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
}
