//! Shared role lookup cache with single-flight refresh.
//!
//! [`RoleCache`] memoizes the remote role table for a TTL window, makes sure
//! concurrent callers share one in-flight fetch, and answers lookups,
//! classification, statistics and batch counts from the published
//! [`CacheSnapshot`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod snapshot;

pub use cache::{CacheConfig, CacheState, CacheStatus, RoleCache};
pub use snapshot::CacheSnapshot;
