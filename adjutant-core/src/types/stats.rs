//! Aggregate reads over a role table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::record::{normalize_key, Classification, RoleRecord};

/// Per-classification totals over every cached role.
///
/// `confirmed + rejected + deliverable == total`: each record lands in
/// exactly one bucket, following [`Classification`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStats {
    /// Number of cached roles.
    pub total: usize,
    /// Active, not deliverable.
    pub confirmed: usize,
    /// Neither active nor deliverable.
    pub rejected: usize,
    /// Deliverable flag set.
    pub deliverable: usize,
}

impl RoleStats {
    /// Scans a set of records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RoleRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut stats, record| {
            stats.total += 1;
            match record.classify() {
                Classification::Deliverable => stats.deliverable += 1,
                Classification::Confirmed => stats.confirmed += 1,
                Classification::Rejected => stats.rejected += 1,
            }
            stats
        })
    }
}

/// How many of a batch of names the table knows about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicationCount {
    /// Names present in the table.
    pub adjudicated: usize,
    /// Names in the batch.
    pub total: usize,
    /// Present and active (deliverable roles included).
    pub confirmed: usize,
    /// Present and inactive.
    pub rejected: usize,
}

impl AdjudicationCount {
    /// Tallies `names` against `records`. Names are normalized before lookup;
    /// unknown names only count toward `total`.
    pub fn tally<S: AsRef<str>>(records: &HashMap<String, RoleRecord>, names: &[S]) -> Self {
        let mut count = Self {
            total: names.len(),
            ..Self::default()
        };

        for name in names {
            let Some(record) = records.get(&normalize_key(name.as_ref())) else {
                continue;
            };
            count.adjudicated += 1;
            if record.is_active {
                count.confirmed += 1;
            } else {
                count.rejected += 1;
            }
        }

        count
    }
}
