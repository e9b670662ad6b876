//! Domain types for Adjutant.
//!
//! - [`RawRole`]: A role record as delivered by the remote source
//! - [`RoleRecord`]: A normalized, cached role
//! - [`Classification`]: Deliverable / Confirmed / Rejected decision
//! - [`RoleStats`] and [`AdjudicationCount`]: Aggregate reads over a snapshot

mod record;
mod stats;

pub use record::*;
pub use stats::*;
