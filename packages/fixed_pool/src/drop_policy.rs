/// Determines what happens when a pool is dropped while some of its items are still acquired.
///
/// By default, the pool silently drops all of its items, acquired or not.
///
/// # Examples
///
/// ```
/// use fixed_pool::{DropPolicy, FixedPool};
///
/// // The drop policy is set at pool creation time.
/// let pool = FixedPool::<u32>::builder()
///     .capacity(8)
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool may be dropped with acquired items. This is the default.
    #[default]
    MayDropItems,

    /// The pool will panic if any items are still acquired when it is dropped.
    ///
    /// This is useful to detect handles that were dropped or forgotten instead of being
    /// released, which otherwise silently shrink the usable capacity of the pool.
    MustNotDropItems,
}
