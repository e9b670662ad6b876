//! # Adjutant Core
//!
//! Core types, errors, and traits for the Adjutant role lookup cache.
//!
//! This crate provides the building blocks shared by every other Adjutant crate:
//!
//! - **Types**: Role records, their wire form, classification and aggregate counts
//! - **Errors**: Fetch failure taxonomy with transport/parse classification
//! - **Constants**: Defaults for TTL, timeouts and record fields
//! - **Traits**: The [`RoleSource`] seam the cache fetches through
//! - **Badge**: Presentation labels layered on top of [`Classification`]
//!
//! ## Example
//!
//! ```rust
//! use adjutant_core::{normalize_key, RawRole, normalize_roles, Classification};
//!
//! let raw = vec![RawRole::new(" Project Manager ", true).deliverable(true)];
//! let normalized = normalize_roles(raw);
//! let record = &normalized.records[&normalize_key("PROJECT MANAGER")];
//! assert_eq!(record.classify(), Classification::Deliverable);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod badge;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use badge::{render_badge, BadgeOptions, BadgeSize};
pub use constants::*;
pub use error::{AdjutantError, Result};
pub use traits::*;
pub use types::*;
