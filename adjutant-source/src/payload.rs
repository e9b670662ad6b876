//! Role table payload parsing.

use serde::Deserialize;

use adjutant_core::error::{AdjutantError, Result};
use adjutant_core::types::RawRole;

/// Accepted body shapes: a bare array or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum RolePayload {
    Bare(Vec<RawRole>),
    Wrapped {
        #[serde(alias = "data")]
        roles: Vec<RawRole>,
    },
}

/// Parses a role table body.
///
/// The whole body must parse; one malformed record fails the payload so a
/// half-read table is never handed to the cache.
pub fn parse_payload(body: &[u8]) -> Result<Vec<RawRole>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AdjutantError::ParseFailure("empty body".into()));
    }

    match serde_json::from_slice::<RolePayload>(body)? {
        RolePayload::Bare(roles) | RolePayload::Wrapped { roles } => Ok(roles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let roles = parse_payload(br#"[{"name": "Reviewer", "is_active": false}]"#).unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name.as_deref(), Some("Reviewer"));
    }

    #[test]
    fn test_parse_wrapped() {
        let body = br#"{"roles": [
            {"name": "Project Manager", "isActive": true, "isDeliverable": true, "source": "sync"},
            {"name": "QA", "active": true, "category": "engineering"}
        ]}"#;
        let roles = parse_payload(body).unwrap();

        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].source.as_deref(), Some("sync"));
        assert_eq!(roles[1].category.as_deref(), Some("engineering"));
    }

    #[test]
    fn test_parse_data_alias() {
        let roles = parse_payload(br#"{"data": []}"#).unwrap();
        assert!(roles.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_payload(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AdjutantError::Json(_)));
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_parse_rejects_bad_record() {
        let err = parse_payload(br#"[{"name": "ok", "is_active": true}, {"name": "bad", "is_active": "yes"}]"#)
            .unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_parse_rejects_empty_body() {
        assert!(parse_payload(b"  \n").unwrap_err().is_parse_failure());
    }
}
