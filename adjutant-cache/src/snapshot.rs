//! Immutable, atomically published copy of the role table.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use adjutant_core::types::{normalize_key, AdjudicationCount, RoleRecord, RoleStats};

/// One complete copy of the role table.
///
/// Snapshots are never mutated after construction; a refresh publishes a new
/// one in place of the old.
#[derive(Clone, Debug)]
pub struct CacheSnapshot {
    records: HashMap<String, RoleRecord>,
    fetched_at: DateTime<Utc>,
    loaded_at: Instant,
}

impl CacheSnapshot {
    /// Wraps a normalized table, stamping it with the current time.
    pub fn new(records: HashMap<String, RoleRecord>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
            loaded_at: Instant::now(),
        }
    }

    /// Records by normalized key.
    pub fn records(&self) -> &HashMap<String, RoleRecord> {
        &self.records
    }

    /// Wall-clock publication time.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Time since publication.
    pub fn age(&self) -> Duration {
        self.loaded_at.elapsed()
    }

    /// True while the snapshot is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }

    /// Looks up a role by name, normalizing it first.
    pub fn get(&self, name: &str) -> Option<&RoleRecord> {
        self.records.get(&normalize_key(name))
    }

    /// Number of cached roles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the table has no roles.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per-classification totals.
    pub fn stats(&self) -> RoleStats {
        RoleStats::from_records(self.records.values())
    }

    /// Batch membership counts.
    pub fn count_adjudicated<S: AsRef<str>>(&self, names: &[S]) -> AdjudicationCount {
        AdjudicationCount::tally(&self.records, names)
    }
}
