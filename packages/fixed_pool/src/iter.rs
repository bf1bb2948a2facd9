use std::iter::FusedIterator;
use std::slice;

use crate::FixedPool;

/// Iterator over the acquired items of a [`FixedPool`].
///
/// Yields a shared reference to every acquired item exactly once and never yields a free item.
/// The order is unspecified. Holding the iterator borrows the pool, so the pool cannot be
/// modified while iterating.
///
/// # Example
///
/// ```rust
/// use fixed_pool::FixedPool;
///
/// let mut pool = FixedPool::<u32>::builder()
///     .capacity(4)
///     .on_acquired(|item| *item = 7)
///     .build()
///     .unwrap();
///
/// let _a = pool.acquire().unwrap();
/// let _b = pool.acquire().unwrap();
///
/// assert_eq!(pool.iter().len(), 2);
/// assert!(pool.iter().all(|item| *item == 7));
/// ```
#[derive(Debug)]
pub struct Iter<'p, T> {
    storage: &'p [T],
    slots: slice::Iter<'p, usize>,
}

impl<'p, T> Iter<'p, T> {
    pub(crate) fn new(storage: &'p [T], acquired_slots: &'p [usize]) -> Self {
        Self {
            storage,
            slots: acquired_slots.iter(),
        }
    }

    fn item(&self, slot: usize) -> &'p T {
        let storage = self.storage;

        storage
            .get(slot)
            .expect("acquired slot indexes are always within the pool capacity")
    }
}

impl<'p, T> Iterator for Iter<'p, T> {
    type Item = &'p T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = *self.slots.next()?;
        Some(self.item(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let slot = *self.slots.next_back()?;
        Some(self.item(slot))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.slots.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'p, T> IntoIterator for &'p FixedPool<T> {
    type Item = &'p T;
    type IntoIter = Iter<'p, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn yields_only_listed_slots() {
        let storage = [10, 11, 12, 13];
        let acquired = [2, 0];

        let items: Vec<_> = Iter::new(&storage, &acquired).copied().collect();

        assert_eq!(items, [12, 10]);
    }

    #[test]
    fn empty_yields_nothing() {
        let storage = [1, 2, 3];

        let mut iter = Iter::new(&storage, &[]);

        assert_eq!(iter.len(), 0);
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn double_ended_and_exact_size() {
        let storage = ['a', 'b', 'c'];
        let acquired = [0, 1, 2];

        let mut iter = Iter::new(&storage, &acquired);

        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next_back(), Some(&'c'));
        assert_eq!(iter.next(), Some(&'a'));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next(), Some(&'b'));
        assert_eq!(iter.next_back(), None);
    }
}
