#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A fixed-capacity object pool that allocates all of its items up front and recycles them.
//!
//! This crate provides [`FixedPool`], a pool that creates `capacity` default-constructed items
//! when it is built and never allocates or frees items again for its whole lifetime. Callers
//! [acquire][FixedPool::acquire] items, use them and [release][FixedPool::release] them back,
//! which avoids allocation churn for short-lived objects that are frequently recycled, such as
//! entities in a game loop or buffers on a request path.
//!
//! # Key Features
//!
//! - **Fixed capacity**: all items are allocated once; acquiring from a full pool is an error
//! - **Move-only handles**: [`Pooled<T>`] cannot be copied, and releasing consumes or clears it
//! - **Mutation hooks**: ordered callbacks that initialize items on acquire and clean them up on
//!   release, subscribed and unsubscribed at any time
//! - **Iteration**: visit every currently acquired item via [`FixedPool::iter()`]
//! - **Checked releases**: foreign, absent and surplus releases are reported as [`Error`]s and
//!   never corrupt the pool
//!
//! # Example
//!
//! ```rust
//! use fixed_pool::FixedPool;
//!
//! #[derive(Default)]
//! struct Particle {
//!     position: (f32, f32),
//!     alive: bool,
//! }
//!
//! let mut pool = FixedPool::<Particle>::new(128).unwrap();
//!
//! pool.subscribe_on_acquired(|particle| particle.alive = true);
//! pool.subscribe_on_released(|particle| {
//!     particle.alive = false;
//!     particle.position = (0.0, 0.0);
//! });
//!
//! let mut particle = pool.acquire().unwrap();
//! pool.get_mut(&mut particle).position = (1.0, 2.0);
//!
//! assert_eq!(pool.iter().filter(|p| p.alive).count(), 1);
//!
//! // Releasing consumes the handle, so the particle cannot be touched afterwards.
//! pool.release_owned(particle).unwrap();
//! assert!(pool.is_empty());
//! ```
//!
//! # Releasing through an `Option`
//!
//! [`FixedPool::release()`] takes the handle by `&mut Option<Pooled<T>>` and clears it on
//! success, which suits callers that keep handles in struct fields:
//!
//! ```rust
//! use fixed_pool::{Error, FixedPool};
//!
//! let mut pool = FixedPool::<String>::new(1).unwrap();
//!
//! let mut slot = Some(pool.acquire().unwrap());
//! pool.release(&mut slot).unwrap();
//! assert!(slot.is_none());
//!
//! assert_eq!(pool.release(&mut slot), Err(Error::NullElement));
//! ```

mod builder;
mod drop_policy;
mod error;
mod hooks;
mod iter;
mod pool;
mod pooled;

pub use builder::*;
pub use drop_policy::*;
pub use error::*;
pub(crate) use hooks::Hooks;
pub use hooks::HookId;
pub use iter::Iter;
pub use pool::FixedPool;
pub use pooled::Pooled;
