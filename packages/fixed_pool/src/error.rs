use std::fmt;

use thiserror::Error;

use crate::Pooled;

/// Errors that can occur when operating a [`FixedPool`][crate::FixedPool].
///
/// Every error is reported before the pool is modified, so a failed operation leaves the pool
/// exactly as it was.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The pool was configured with a capacity of zero.
    #[error("pool capacity must be greater than zero")]
    InvalidCapacity,

    /// Every item in the pool is already acquired.
    #[error("no more items available in pool (capacity {capacity})")]
    PoolExhausted {
        /// The capacity of the pool that ran out of items.
        capacity: usize,
    },

    /// The caller attempted to release an empty handle slot.
    #[error("item to release cannot be absent")]
    NullElement,

    /// The caller attempted to release an item while no items are acquired.
    #[error("impossible to release item, no items are acquired from the pool")]
    PoolUnderflow,

    /// The handle does not refer to an item currently acquired from this pool.
    #[error("item was not acquired from this pool and cannot be released")]
    ForeignElement,
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

/// The error returned by [`FixedPool::release_owned()`][crate::FixedPool::release_owned].
///
/// Releasing a handle by value would lose the handle if the release fails, so the rejected
/// handle is handed back to the caller together with the reason for the rejection.
pub struct ReleaseError<T> {
    error: Error,
    handle: Pooled<T>,
}

impl<T> ReleaseError<T> {
    pub(crate) fn new(error: Error, handle: Pooled<T>) -> Self {
        Self { error, handle }
    }

    /// The reason the handle was rejected.
    #[must_use]
    pub fn error(&self) -> Error {
        self.error
    }

    /// Takes back the handle that could not be released.
    #[must_use]
    pub fn into_handle(self) -> Pooled<T> {
        self.handle
    }
}

impl<T> fmt::Debug for ReleaseError<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseError")
            .field("error", &self.error)
            .field("handle", &self.handle)
            .finish()
    }
}

impl<T> fmt::Display for ReleaseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T> std::error::Error for ReleaseError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<ReleaseError<T>> for Error {
    fn from(value: ReleaseError<T>) -> Self {
        value.error
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, fmt::Debug, Copy);
    assert_impl_all!(ReleaseError<String>: Send, Sync, fmt::Debug, std::error::Error);

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            Error::PoolExhausted { capacity: 3 }.to_string(),
            "no more items available in pool (capacity 3)"
        );
        assert_eq!(
            Error::InvalidCapacity.to_string(),
            "pool capacity must be greater than zero"
        );
    }

    #[test]
    fn release_error_is_error() {
        let error = ReleaseError::new(Error::ForeignElement, Pooled::<u32>::new(0, 0));

        assert_eq!(error.error(), Error::ForeignElement);
        assert_eq!(error.to_string(), Error::ForeignElement.to_string());

        let handle = error.into_handle();
        assert_eq!(handle.slot(), 0);
    }
}
