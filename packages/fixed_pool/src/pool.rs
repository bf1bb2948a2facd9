use std::fmt;
use std::iter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use tracing::{debug, trace};

use crate::{
    DropPolicy, Error, FixedPoolBuilder, HookId, Hooks, Iter, Pooled, ReleaseError, Result,
};

/// Global counter for generating unique pool IDs.
static POOL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generates a unique pool ID.
fn generate_pool_id() -> u64 {
    POOL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// An object pool with a fixed number of items, all allocated when the pool is created.
///
/// Items are handed out by [`acquire()`][1] and given back by [`release()`][2] or
/// [`release_owned()`][3]. The pool never creates or destroys items after construction; it only
/// moves them between the free part of the pool and the acquired part. Items are not reset when
/// they are recycled. Instead, the pool runs mutation hooks at each transition:
///
/// * hooks subscribed via [`subscribe_on_acquired()`][4] run on an item just before it is handed
///   out, which is the place to initialize it for its next use.
/// * hooks subscribed via [`subscribe_on_released()`][5] run on an item as it comes back, which
///   is the place to clear state that must not outlive the current use.
///
/// The most recently released item is the next one to be acquired.
///
/// # Example
///
/// ```rust
/// use fixed_pool::FixedPool;
///
/// #[derive(Default)]
/// struct Bullet {
///     state: String,
/// }
///
/// let mut pool = FixedPool::<Bullet>::new(2).unwrap();
/// pool.subscribe_on_acquired(|bullet| bullet.state = "SET".to_string());
/// pool.subscribe_on_released(|bullet| bullet.state = "UNSET".to_string());
///
/// let mut bullet = Some(pool.acquire().unwrap());
/// assert_eq!(pool.len(), 1);
/// assert_eq!(pool.get(bullet.as_ref().unwrap()).state, "SET");
///
/// pool.release(&mut bullet).unwrap();
/// assert!(bullet.is_none());
/// assert_eq!(pool.len(), 0);
/// ```
///
/// # Thread safety
///
/// The pool is single-threaded. Hooks are arbitrary closures, so the pool is neither [`Send`]
/// nor [`Sync`].
///
/// [1]: Self::acquire
/// [2]: Self::release
/// [3]: Self::release_owned
/// [4]: Self::subscribe_on_acquired
/// [5]: Self::subscribe_on_released
pub struct FixedPool<T> {
    /// Ensures handles from other pools are rejected.
    pool_id: u64,

    /// The items themselves. Items never move between slots, so a slot index is a stable
    /// identity for the item in it.
    storage: Box<[T]>,

    /// A permutation of all slot indexes. The first `len` entries are the acquired slots, the
    /// rest are free. The entry at `len` is the next slot to be acquired.
    order: Box<[usize]>,

    /// The inverse of `order`: for each slot, its position in `order`. A slot is acquired if and
    /// only if its position is below `len`.
    positions: Box<[usize]>,

    /// Number of acquired items.
    len: usize,

    on_acquired: Hooks<T>,
    on_released: Hooks<T>,

    drop_policy: DropPolicy,
}

impl<T: Default> FixedPool<T> {
    /// Creates a pool that holds `capacity` items, each created via [`Default`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::{Error, FixedPool};
    ///
    /// let pool = FixedPool::<String>::new(10).unwrap();
    /// assert_eq!(pool.capacity(), 10);
    /// assert_eq!(pool.len(), 0);
    ///
    /// assert_eq!(
    ///     FixedPool::<String>::new(0).unwrap_err(),
    ///     Error::InvalidCapacity
    /// );
    /// ```
    pub fn new(capacity: usize) -> Result<Self> {
        Self::builder().capacity(capacity).build()
    }

    /// Starts building a new [`FixedPool`].
    ///
    /// Use this when you want to customize the pool configuration beyond the capacity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::{DropPolicy, FixedPool};
    ///
    /// let pool = FixedPool::<u32>::builder()
    ///     .capacity(32)
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(pool.capacity(), 32);
    /// ```
    pub fn builder() -> FixedPoolBuilder<T> {
        FixedPoolBuilder::new()
    }

    pub(crate) fn new_inner(
        capacity: usize,
        drop_policy: DropPolicy,
        on_acquired: Hooks<T>,
        on_released: Hooks<T>,
    ) -> Result<Self> {
        if capacity == 0 {
            debug!(
                item_type = std::any::type_name::<T>(),
                "rejected pool with zero capacity"
            );
            return Err(Error::InvalidCapacity);
        }

        let pool_id = generate_pool_id();

        let storage = iter::repeat_with(T::default).take(capacity).collect();

        debug!(
            pool_id,
            capacity,
            item_type = std::any::type_name::<T>(),
            "created pool"
        );

        Ok(Self {
            pool_id,
            storage,
            order: (0..capacity).collect(),
            positions: (0..capacity).collect(),
            len: 0,
            on_acquired,
            on_released,
            drop_policy,
        })
    }
}

impl<T> FixedPool<T> {
    /// The number of items the pool holds, acquired or not. This never changes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The number of acquired items.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedPool;
    ///
    /// let mut pool = FixedPool::<u8>::new(10).unwrap();
    ///
    /// let a = pool.acquire().unwrap();
    /// let b = pool.acquire().unwrap();
    /// assert_eq!(pool.len(), 2);
    ///
    /// pool.release_owned(a).unwrap();
    /// assert_eq!(pool.len(), 1);
    ///
    /// pool.release_owned(b).unwrap();
    /// assert_eq!(pool.len(), 0);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no items are acquired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every item is acquired, meaning the next [`acquire()`][Self::acquire] will fail.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// The number of items that can still be acquired.
    #[must_use]
    pub fn available(&self) -> usize {
        self.capacity()
            .checked_sub(self.len)
            .expect("the number of acquired items can never exceed the capacity")
    }

    /// Acquires a free item from the pool.
    ///
    /// Every hook subscribed via [`subscribe_on_acquired()`][1] runs on the item, in
    /// subscription order, before the handle is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolExhausted`] if every item is already acquired. The pool is not
    /// modified in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::{Error, FixedPool};
    ///
    /// let mut pool = FixedPool::<u32>::new(1).unwrap();
    ///
    /// let item = pool.acquire().unwrap();
    ///
    /// assert_eq!(
    ///     pool.acquire().unwrap_err(),
    ///     Error::PoolExhausted { capacity: 1 }
    /// );
    /// # pool.release_owned(item).unwrap();
    /// ```
    ///
    /// [1]: Self::subscribe_on_acquired
    pub fn acquire(&mut self) -> Result<Pooled<T>> {
        let capacity = self.capacity();

        if self.len == capacity {
            debug!(
                pool_id = self.pool_id,
                capacity, "rejected acquire from exhausted pool"
            );
            return Err(Error::PoolExhausted { capacity });
        }

        let slot = *self
            .order
            .get(self.len)
            .expect("order always has an entry for every slot and len is below capacity");

        let item = self
            .storage
            .get_mut(slot)
            .expect("order only contains slot indexes that exist in storage");

        self.on_acquired.invoke(item);

        // Cannot overflow because len was below capacity.
        self.len = self.len.wrapping_add(1);

        trace!(pool_id = self.pool_id, slot, len = self.len, "acquired item");

        Ok(Pooled::new(self.pool_id, slot))
    }

    /// Releases an acquired item back to the pool and clears the caller's handle.
    ///
    /// Every hook subscribed via [`subscribe_on_released()`][1] runs on the item, in
    /// subscription order, before the item becomes available again. The released item is the
    /// next one handed out by [`acquire()`][2].
    ///
    /// On success, `handle` is set to `None`. On failure, neither the pool nor `handle` is
    /// modified.
    ///
    /// # Errors
    ///
    /// * [`Error::NullElement`] if `handle` is `None`.
    /// * [`Error::PoolUnderflow`] if no items are acquired from the pool.
    /// * [`Error::ForeignElement`] if the handle was not acquired from this pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::{Error, FixedPool};
    ///
    /// let mut pool = FixedPool::<u32>::new(1).unwrap();
    ///
    /// let mut item = Some(pool.acquire().unwrap());
    ///
    /// pool.release(&mut item).unwrap();
    /// assert!(item.is_none());
    ///
    /// // The handle is gone, so a second release has nothing to release.
    /// assert_eq!(pool.release(&mut item).unwrap_err(), Error::NullElement);
    /// ```
    ///
    /// [1]: Self::subscribe_on_released
    /// [2]: Self::acquire
    pub fn release(&mut self, handle: &mut Option<Pooled<T>>) -> Result<()> {
        let Some(pooled) = handle.as_ref() else {
            debug!(pool_id = self.pool_id, "rejected release of absent item");
            return Err(Error::NullElement);
        };

        self.check_release(pooled)?;
        self.release_slot(pooled.slot());

        // Cleared only once the hooks have run, so a panicking hook leaves the caller holding
        // a handle that can still be released.
        *handle = None;

        Ok(())
    }

    /// Releases an acquired item back to the pool, consuming the handle.
    ///
    /// This is the same as [`release()`][1] for callers that hold the handle by value. If the
    /// release is rejected, the handle is returned inside the error.
    ///
    /// # Errors
    ///
    /// * [`Error::PoolUnderflow`] if no items are acquired from the pool.
    /// * [`Error::ForeignElement`] if the handle was not acquired from this pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::{Error, FixedPool};
    ///
    /// let mut pool_a = FixedPool::<u32>::new(1).unwrap();
    /// let mut pool_b = FixedPool::<u32>::new(1).unwrap();
    ///
    /// let item = pool_a.acquire().unwrap();
    /// let _other = pool_b.acquire().unwrap();
    ///
    /// let rejected = pool_b.release_owned(item).unwrap_err();
    /// assert_eq!(rejected.error(), Error::ForeignElement);
    ///
    /// // The handle was not lost and can still go back where it came from.
    /// pool_a.release_owned(rejected.into_handle()).unwrap();
    /// ```
    ///
    /// [1]: Self::release
    pub fn release_owned(&mut self, handle: Pooled<T>) -> std::result::Result<(), ReleaseError<T>> {
        if let Err(error) = self.check_release(&handle) {
            return Err(ReleaseError::new(error, handle));
        }

        self.release_slot(handle.slot());

        Ok(())
    }

    /// Runs the release hooks on an acquired slot and moves it to the front of the free region.
    fn release_slot(&mut self, slot: usize) {
        let item = self
            .storage
            .get_mut(slot)
            .expect("validated handles always point to an existing slot");

        // Hooks run before any bookkeeping changes, so a panicking hook leaves the item acquired
        // and the pool consistent.
        self.on_released.invoke(item);

        // Cannot wrap because check_release() verified that at least one item is acquired.
        let last_acquired = self.len.wrapping_sub(1);

        let position = self.position_of(slot);
        self.swap_positions(position, last_acquired);
        self.len = last_acquired;

        trace!(pool_id = self.pool_id, slot, len = self.len, "released item");
    }

    fn check_release(&self, handle: &Pooled<T>) -> Result<()> {
        let verdict = if self.len == 0 {
            Err(Error::PoolUnderflow)
        } else if handle.pool_id() != self.pool_id || !self.is_acquired(handle.slot()) {
            Err(Error::ForeignElement)
        } else {
            Ok(())
        };

        if let Err(error) = verdict {
            debug!(
                pool_id = self.pool_id,
                handle_pool_id = handle.pool_id(),
                slot = handle.slot(),
                %error,
                "rejected release"
            );
        }

        verdict
    }

    /// Whether the handle refers to an item currently acquired from this pool.
    #[must_use]
    pub fn contains(&self, handle: &Pooled<T>) -> bool {
        handle.pool_id() == self.pool_id && self.is_acquired(handle.slot())
    }

    /// Gets a shared reference to an acquired item.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not acquired from this pool.
    #[must_use]
    pub fn get(&self, handle: &Pooled<T>) -> &T {
        self.assert_owns(handle);

        self.storage
            .get(handle.slot())
            .expect("handles from this pool always point to an existing slot")
    }

    /// Gets an exclusive reference to an acquired item.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedPool;
    ///
    /// let mut pool = FixedPool::<Vec<u32>>::new(2).unwrap();
    ///
    /// let mut item = pool.acquire().unwrap();
    /// pool.get_mut(&mut item).push(42);
    ///
    /// assert_eq!(pool.get(&item), &[42]);
    /// # pool.release_owned(item).unwrap();
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the handle was not acquired from this pool.
    #[must_use]
    pub fn get_mut(&mut self, handle: &mut Pooled<T>) -> &mut T {
        self.assert_owns(handle);

        self.storage
            .get_mut(handle.slot())
            .expect("handles from this pool always point to an existing slot")
    }

    fn assert_owns(&self, handle: &Pooled<T>) {
        assert!(
            handle.pool_id() == self.pool_id,
            "attempted to access an item through a handle from a different pool (handle pool ID: {}, current pool ID: {})",
            handle.pool_id(),
            self.pool_id
        );

        debug_assert!(
            self.is_acquired(handle.slot()),
            "a handle from this pool must refer to an acquired item"
        );
    }

    /// Returns an iterator over the acquired items, in unspecified order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedPool;
    ///
    /// let mut pool = FixedPool::<u32>::new(3).unwrap();
    ///
    /// let mut a = pool.acquire().unwrap();
    /// *pool.get_mut(&mut a) = 1;
    /// let mut b = pool.acquire().unwrap();
    /// *pool.get_mut(&mut b) = 2;
    ///
    /// let mut items: Vec<u32> = pool.iter().copied().collect();
    /// items.sort_unstable();
    /// assert_eq!(items, [1, 2]);
    /// # pool.release_owned(a).unwrap();
    /// # pool.release_owned(b).unwrap();
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        let acquired = self
            .order
            .get(..self.len)
            .expect("len never exceeds the number of slots");

        Iter::new(&self.storage, acquired)
    }

    /// Subscribes a hook that runs on every item as it is acquired.
    ///
    /// Hooks run in subscription order. The returned identifier unsubscribes the hook via
    /// [`unsubscribe_on_acquired()`][Self::unsubscribe_on_acquired].
    pub fn subscribe_on_acquired(&mut self, hook: impl FnMut(&mut T) + 'static) -> HookId {
        self.on_acquired.subscribe(Box::new(hook))
    }

    /// Removes a hook subscribed via [`subscribe_on_acquired()`][Self::subscribe_on_acquired].
    ///
    /// Returns whether a hook was removed. Unsubscribing an identifier that is not subscribed is
    /// not an error.
    pub fn unsubscribe_on_acquired(&mut self, id: HookId) -> bool {
        self.on_acquired.unsubscribe(id)
    }

    /// Subscribes a hook that runs on every item as it is released.
    ///
    /// Hooks run in subscription order. The returned identifier unsubscribes the hook via
    /// [`unsubscribe_on_released()`][Self::unsubscribe_on_released].
    pub fn subscribe_on_released(&mut self, hook: impl FnMut(&mut T) + 'static) -> HookId {
        self.on_released.subscribe(Box::new(hook))
    }

    /// Removes a hook subscribed via [`subscribe_on_released()`][Self::subscribe_on_released].
    ///
    /// Returns whether a hook was removed.
    pub fn unsubscribe_on_released(&mut self, id: HookId) -> bool {
        self.on_released.unsubscribe(id)
    }

    /// The number of hooks that run when an item is acquired.
    #[must_use]
    pub fn on_acquired_count(&self) -> usize {
        self.on_acquired.len()
    }

    /// The number of hooks that run when an item is released.
    #[must_use]
    pub fn on_released_count(&self) -> usize {
        self.on_released.len()
    }

    fn is_acquired(&self, slot: usize) -> bool {
        self.positions
            .get(slot)
            .is_some_and(|&position| position < self.len)
    }

    fn position_of(&self, slot: usize) -> usize {
        *self
            .positions
            .get(slot)
            .expect("every slot has a recorded position")
    }

    #[allow(
        clippy::indexing_slicing,
        reason = "callers only pass positions below capacity and order is a permutation of slots"
    )]
    fn swap_positions(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);

        let slot_a = self.order[a];
        let slot_b = self.order[b];

        self.positions[slot_a] = a;
        self.positions[slot_b] = b;
    }
}

impl<T> fmt::Debug for FixedPool<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedPool")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("pool_id", &self.pool_id)
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("on_acquired", &self.on_acquired)
            .field("on_released", &self.on_released)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<T> Drop for FixedPool<T> {
    fn drop(&mut self) {
        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was, leading to debug difficulties.
        if !thread::panicking() && matches!(self.drop_policy, DropPolicy::MustNotDropItems) {
            assert!(
                self.len == 0,
                "dropped a FixedPool with {} acquired items - this is forbidden by DropPolicy::MustNotDropItems",
                self.len
            );
        }
    }
}
