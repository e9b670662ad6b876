//! Presentation labels for classified roles.
//!
//! This is a pure mapping from a [`Classification`] to a display string and
//! sits outside the cache; the API and CLI call it on query results.

use serde::{Deserialize, Serialize};

use crate::types::Classification;

/// Badge size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeSize {
    /// Capitalized label.
    #[default]
    Standard,
    /// Lowercase label.
    Small,
}

/// Recognized badge options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeOptions {
    /// Single-letter label instead of the full word.
    #[serde(default)]
    pub compact: bool,
    /// Badge size.
    #[serde(default)]
    pub size: BadgeSize,
}

impl BadgeOptions {
    /// Compact badge at the default size.
    pub fn compact() -> Self {
        Self {
            compact: true,
            ..Self::default()
        }
    }
}

/// Renders the label for a classification; `None` means the role is unknown.
pub fn render_badge(classification: Option<Classification>, options: &BadgeOptions) -> String {
    let (full, short) = match classification {
        Some(Classification::Deliverable) => ("Deliverable", "D"),
        Some(Classification::Confirmed) => ("Confirmed", "C"),
        Some(Classification::Rejected) => ("Rejected", "R"),
        None => ("Unknown", "?"),
    };
    let label = if options.compact { short } else { full };

    match options.size {
        BadgeSize::Standard => label.to_string(),
        BadgeSize::Small => label.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some(Classification::Deliverable), false => "Deliverable")]
    #[test_case(Some(Classification::Confirmed), false => "Confirmed")]
    #[test_case(Some(Classification::Rejected), true => "R")]
    #[test_case(None, false => "Unknown")]
    #[test_case(None, true => "?")]
    fn test_render_standard(classification: Option<Classification>, compact: bool) -> String {
        let options = BadgeOptions {
            compact,
            size: BadgeSize::Standard,
        };
        render_badge(classification, &options)
    }

    #[test]
    fn test_render_small() {
        let options = BadgeOptions {
            compact: false,
            size: BadgeSize::Small,
        };
        assert_eq!(render_badge(Some(Classification::Confirmed), &options), "confirmed");
    }

    #[test]
    fn test_options_default_from_empty_json() {
        let options: BadgeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, BadgeOptions::default());
        assert!(BadgeOptions::compact().compact);
    }
}
