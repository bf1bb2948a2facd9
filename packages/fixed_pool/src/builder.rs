use std::fmt;

use crate::{DropPolicy, FixedPool, Hooks, Result};

/// Builder for creating an instance of [`FixedPool`].
///
/// Use this builder if you want hooks to be in place before the first item is acquired or if
/// you want to change the [drop policy][DropPolicy]. [`FixedPool::new()`][1] is sufficient when
/// only the capacity matters.
///
/// # Examples
///
/// ```
/// use fixed_pool::{DropPolicy, FixedPool};
///
/// let mut pool = FixedPool::<Vec<u8>>::builder()
///     .capacity(16)
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .on_released(Vec::clear)
///     .build()
///     .unwrap();
///
/// let item = pool.acquire().unwrap();
/// pool.release_owned(item).unwrap();
/// ```
///
/// [1]: FixedPool::new
#[must_use]
pub struct FixedPoolBuilder<T> {
    capacity: usize,
    drop_policy: DropPolicy,

    on_acquired: Hooks<T>,
    on_released: Hooks<T>,
}

impl<T> fmt::Debug for FixedPoolBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedPoolBuilder")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("capacity", &self.capacity)
            .field("drop_policy", &self.drop_policy)
            .field("on_acquired", &self.on_acquired)
            .field("on_released", &self.on_released)
            .finish()
    }
}

impl<T: Default> FixedPoolBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: 0,
            drop_policy: DropPolicy::default(),
            on_acquired: Hooks::new(),
            on_released: Hooks::new(),
        }
    }

    /// Sets the number of items the pool pre-allocates. This is required and must be non-zero.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs how to treat items that
    /// are still acquired when the pool is dropped.
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Subscribes a hook that runs on every item as it is acquired.
    ///
    /// Hooks registered here run before any hooks subscribed later through
    /// [`FixedPool::subscribe_on_acquired()`]. The identifier of a hook registered through the
    /// builder is not exposed, so such hooks stay subscribed for the lifetime of the pool.
    pub fn on_acquired(mut self, hook: impl FnMut(&mut T) + 'static) -> Self {
        self.on_acquired.subscribe(Box::new(hook));
        self
    }

    /// Subscribes a hook that runs on every item as it is released.
    ///
    /// Hooks registered here run before any hooks subscribed later through
    /// [`FixedPool::subscribe_on_released()`]. The identifier of a hook registered through the
    /// builder is not exposed, so such hooks stay subscribed for the lifetime of the pool.
    pub fn on_released(mut self, hook: impl FnMut(&mut T) + 'static) -> Self {
        self.on_released.subscribe(Box::new(hook));
        self
    }

    /// Builds the pool, allocating every item up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`][crate::Error::InvalidCapacity] if the capacity is zero
    /// or was never set.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_pool::{Error, FixedPool};
    ///
    /// let pool = FixedPool::<u32>::builder().capacity(4).build().unwrap();
    /// assert_eq!(pool.capacity(), 4);
    ///
    /// let missing = FixedPool::<u32>::builder().build();
    /// assert_eq!(missing.unwrap_err(), Error::InvalidCapacity);
    /// ```
    pub fn build(self) -> Result<FixedPool<T>> {
        FixedPool::new_inner(
            self.capacity,
            self.drop_policy,
            self.on_acquired,
            self.on_released,
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::Error;

    use super::*;

    #[test]
    fn default_builder_has_no_capacity() {
        let result = FixedPoolBuilder::<u32>::new().build();

        assert_eq!(result.unwrap_err(), Error::InvalidCapacity);
    }

    #[test]
    fn capacity_is_applied() {
        let pool = FixedPoolBuilder::<u32>::new().capacity(3).build().unwrap();

        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn builder_hooks_are_subscribed() {
        let pool = FixedPoolBuilder::<u32>::new()
            .capacity(1)
            .on_acquired(|item| *item = 1)
            .on_acquired(|item| *item += 1)
            .on_released(|item| *item = 0)
            .build()
            .unwrap();

        assert_eq!(pool.on_acquired_count(), 2);
        assert_eq!(pool.on_released_count(), 1);
    }

    #[test]
    fn debug_includes_configuration() {
        let builder = FixedPoolBuilder::<u32>::new()
            .capacity(9)
            .drop_policy(DropPolicy::MustNotDropItems);

        let debug = format!("{builder:?}");

        assert!(debug.contains("capacity: 9"));
        assert!(debug.contains("MustNotDropItems"));
    }
}
