//! Role records: wire form, normalized form, and classification.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RECORD_CATEGORY, DEFAULT_RECORD_SOURCE};

// ═══════════════════════════════════════════════════════════════════════════════
// KEY NORMALIZATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Canonicalizes a lookup key: trims surrounding whitespace and case-folds.
///
/// Both the fetch path and every lookup go through this function, so
/// `" Project Manager "`, `"project manager"` and `"PROJECT MANAGER"` all
/// address the same record.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE FORM
// ═══════════════════════════════════════════════════════════════════════════════

/// A role record exactly as the remote source delivers it.
///
/// Only the active flag is mandatory. Camel-case field names are accepted as
/// aliases for the flags. The name is read from `name` only; other fields such
/// as `role` or `title` are ignored rather than treated as duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRole {
    /// Role name; records without one are dropped during normalization.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the role is active.
    #[serde(alias = "isActive", alias = "active")]
    pub is_active: bool,
    /// Whether the role is deliverable.
    #[serde(default, alias = "isDeliverable", alias = "deliverable")]
    pub is_deliverable: Option<bool>,
    /// Categorical origin tag.
    #[serde(default)]
    pub source: Option<String>,
    /// Free-form category.
    #[serde(default)]
    pub category: Option<String>,
}

impl RawRole {
    /// Creates a wire record with only the mandatory fields set.
    pub fn new(name: impl Into<String>, is_active: bool) -> Self {
        Self {
            name: Some(name.into()),
            is_active,
            is_deliverable: None,
            source: None,
            category: None,
        }
    }

    /// Sets the deliverable flag.
    pub fn deliverable(mut self, is_deliverable: bool) -> Self {
        self.is_deliverable = Some(is_deliverable);
        self
    }

    /// Sets the source tag.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn needs_defaults(&self) -> bool {
        self.is_deliverable.is_none() || self.source.is_none() || self.category.is_none()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NORMALIZED FORM
// ═══════════════════════════════════════════════════════════════════════════════

/// A cached role, keyed by its normalized name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Normalized lookup key (trimmed, case-folded).
    pub key: String,
    /// Whether the role is active.
    pub is_active: bool,
    /// Whether the role is deliverable.
    pub is_deliverable: bool,
    /// Categorical origin tag, `"manual"` when the source omitted it.
    pub source: String,
    /// Free-form category, empty when the source omitted it.
    pub category: String,
}

impl RoleRecord {
    /// Classifies this record.
    pub fn classify(&self) -> Classification {
        Classification::of(self)
    }
}

/// Result of normalizing a fetched table.
#[derive(Clone, Debug, Default)]
pub struct NormalizedRoles {
    /// Records by normalized key.
    pub records: HashMap<String, RoleRecord>,
    /// Records dropped because their normalized key was empty.
    pub dropped: usize,
    /// Records that had at least one optional field filled with a default.
    pub defaulted: usize,
}

/// Converts wire records into a keyed table.
///
/// Keys are normalized with [`normalize_key`], records with an empty key are
/// dropped, and missing optional fields are defaulted. When two records share
/// a key the later one wins.
pub fn normalize_roles(raw: impl IntoIterator<Item = RawRole>) -> NormalizedRoles {
    let mut normalized = NormalizedRoles::default();

    for role in raw {
        let key = role.name.as_deref().map(normalize_key).unwrap_or_default();
        if key.is_empty() {
            normalized.dropped += 1;
            continue;
        }
        if role.needs_defaults() {
            normalized.defaulted += 1;
        }

        let record = RoleRecord {
            key: key.clone(),
            is_active: role.is_active,
            is_deliverable: role.is_deliverable.unwrap_or(false),
            source: role.source.unwrap_or_else(|| DEFAULT_RECORD_SOURCE.to_string()),
            category: role.category.unwrap_or_else(|| DEFAULT_RECORD_CATEGORY.to_string()),
        };
        normalized.records.insert(key, record);
    }

    normalized
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of classifying a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Deliverable flag set, regardless of the active flag.
    Deliverable,
    /// Active but not deliverable.
    Confirmed,
    /// Neither deliverable nor active.
    Rejected,
}

impl Classification {
    /// Decision table: deliverable beats active beats everything else.
    pub fn of(record: &RoleRecord) -> Self {
        if record.is_deliverable {
            Classification::Deliverable
        } else if record.is_active {
            Classification::Confirmed
        } else {
            Classification::Rejected
        }
    }

    /// Lowercase identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Deliverable => "deliverable",
            Classification::Confirmed => "confirmed",
            Classification::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn record(is_active: bool, is_deliverable: bool) -> RoleRecord {
        RoleRecord {
            key: "role".into(),
            is_active,
            is_deliverable,
            source: DEFAULT_RECORD_SOURCE.into(),
            category: String::new(),
        }
    }

    #[test_case(true, true => Classification::Deliverable; "deliverable and active")]
    #[test_case(false, true => Classification::Deliverable; "deliverable but inactive")]
    #[test_case(true, false => Classification::Confirmed; "active only")]
    #[test_case(false, false => Classification::Rejected; "neither")]
    fn test_classify(is_active: bool, is_deliverable: bool) -> Classification {
        record(is_active, is_deliverable).classify()
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(" Project Manager "), "project manager");
        assert_eq!(normalize_key("PROJECT MANAGER"), "project manager");
        assert_eq!(normalize_key("\tReviewer\n"), "reviewer");
    }

    #[test]
    fn test_normalize_roles_defaults() {
        let normalized = normalize_roles(vec![RawRole::new("Reviewer", false)]);
        let reviewer = &normalized.records["reviewer"];

        assert!(!reviewer.is_deliverable);
        assert_eq!(reviewer.source, "manual");
        assert_eq!(reviewer.category, "");
        assert_eq!(normalized.defaulted, 1);
    }

    #[test]
    fn test_normalize_roles_keeps_explicit_fields() {
        let raw = RawRole::new("Designer", true)
            .deliverable(false)
            .source("import")
            .category("creative");
        let normalized = normalize_roles(vec![raw]);
        let designer = &normalized.records["designer"];

        assert_eq!(designer.source, "import");
        assert_eq!(designer.category, "creative");
        assert_eq!(normalized.defaulted, 0);
    }

    #[test]
    fn test_normalize_roles_drops_empty_keys() {
        let mut nameless = RawRole::new("", true);
        nameless.name = None;

        let normalized = normalize_roles(vec![RawRole::new("   ", true), nameless, RawRole::new("qa", true)]);

        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.dropped, 2);
    }

    #[test]
    fn test_normalize_roles_last_duplicate_wins() {
        let normalized = normalize_roles(vec![
            RawRole::new("Reviewer", true),
            RawRole::new("  REVIEWER", false).category("second"),
        ]);

        assert_eq!(normalized.records.len(), 1);
        let reviewer = &normalized.records["reviewer"];
        assert!(!reviewer.is_active);
        assert_eq!(reviewer.category, "second");
    }

    #[test]
    fn test_raw_role_accepts_camel_case() {
        let raw: RawRole = serde_json::from_str(
            r#"{"name": "Project Manager", "isActive": true, "isDeliverable": true}"#,
        )
        .unwrap();

        assert_eq!(raw.name.as_deref(), Some("Project Manager"));
        assert!(raw.is_active);
        assert_eq!(raw.is_deliverable, Some(true));
        assert!(raw.source.is_none());
    }

    #[test]
    fn test_raw_role_reads_name_beside_role_field() {
        let raw: RawRole = serde_json::from_str(
            r#"{"name": "Reviewer", "role": "reviewer", "title": "Senior Reviewer", "active": false}"#,
        )
        .unwrap();

        assert_eq!(raw.name.as_deref(), Some("Reviewer"));
        assert!(!raw.is_active);
    }

    #[test]
    fn test_raw_role_requires_active_flag() {
        let result: std::result::Result<RawRole, _> = serde_json::from_str(r#"{"name": "qa"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_classification_serializes_lowercase() {
        let json = serde_json::to_string(&Classification::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        assert_eq!(Classification::Rejected.to_string(), "rejected");
    }

    proptest! {
        #[test]
        fn prop_normalize_key_is_idempotent(name in "[a-zA-Z0-9 \\t_-]{0,24}") {
            let once = normalize_key(&name);
            prop_assert_eq!(normalize_key(&once), once);
        }

        #[test]
        fn prop_lookup_key_ignores_padding_and_case(name in "[a-zA-Z ]{1,16}", pad in 0usize..4) {
            let padded = format!("{}{}{}", " ".repeat(pad), name.to_uppercase(), " ".repeat(pad));
            prop_assert_eq!(normalize_key(&padded), normalize_key(&name));
        }
    }
}
