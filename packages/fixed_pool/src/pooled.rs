use std::fmt;
use std::marker::PhantomData;

/// Exclusive handle to an item acquired from a [`FixedPool`].
///
/// The handle identifies one acquired item and is the only way to reach that item through the
/// pool via [`FixedPool::get()`] and [`FixedPool::get_mut()`]. It does not implement [`Copy`] or
/// [`Clone`], so each acquired item has exactly one handle and releasing the item consumes or
/// clears that handle, making it impossible to use the item after it has gone back to the pool.
///
/// Dropping a handle without releasing it keeps the item acquired for the rest of the pool's
/// lifetime.
///
/// # Example
///
/// ```rust
/// use fixed_pool::FixedPool;
///
/// let mut pool = FixedPool::<String>::new(4).unwrap();
///
/// let mut item = Some(pool.acquire().unwrap());
///
/// if let Some(handle) = item.as_mut() {
///     pool.get_mut(handle).push_str("hello");
/// }
///
/// pool.release(&mut item).unwrap();
/// assert!(item.is_none());
/// ```
///
/// [`FixedPool`]: crate::FixedPool
/// [`FixedPool::get()`]: crate::FixedPool::get
/// [`FixedPool::get_mut()`]: crate::FixedPool::get_mut
#[must_use = "dropping the handle without releasing it keeps the item acquired"]
pub struct Pooled<T> {
    /// Ensures this handle can only be returned to the pool it came from.
    pool_id: u64,

    slot: usize,

    _item: PhantomData<fn() -> T>,
}

impl<T> Pooled<T> {
    pub(crate) fn new(pool_id: u64, slot: usize) -> Self {
        Self {
            pool_id,
            slot,
            _item: PhantomData,
        }
    }

    pub(crate) fn pool_id(&self) -> u64 {
        self.pool_id
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }
}

impl<T> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("pool_id", &self.pool_id)
            .field("slot", &self.slot)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(Pooled<String>: Send, Sync, fmt::Debug);
    assert_not_impl_any!(Pooled<String>: Clone, Copy);

    // Handles are tokens, so the thread-safety of T does not leak into them.
    assert_impl_all!(Pooled<std::rc::Rc<u32>>: Send, Sync);

    #[test]
    fn debug_names_item_type_and_slot() {
        let handle = Pooled::<u64>::new(7, 3);

        let debug = format!("{handle:?}");

        assert!(debug.contains("u64"));
        assert!(debug.contains("pool_id: 7"));
        assert!(debug.contains("slot: 3"));
    }
}
