//! Common traits for Adjutant.
//!
//! The cache never talks to the network directly; it fetches through a
//! [`RoleSource`], which lets tests and alternative transports plug in.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RawRole;

/// Interface for the remote role table.
///
/// Implementations might use:
/// - An HTTP endpoint (production)
/// - A static list (tests, offline tooling)
#[async_trait]
pub trait RoleSource: Send + Sync {
    /// Fetches the complete role table in its wire form.
    ///
    /// Each call performs exactly one remote request. Transport and parse
    /// failures are returned as a single error; a partially parsed table is
    /// never returned.
    async fn fetch_roles(&self) -> Result<Vec<RawRole>>;

    /// Short human-readable description used in logs.
    fn describe(&self) -> String {
        "role source".into()
    }
}

/// A role source that always returns the same table.
#[derive(Clone, Debug, Default)]
pub struct StaticRoleSource {
    roles: Vec<RawRole>,
}

impl StaticRoleSource {
    /// Creates a source serving the given records.
    pub fn new(roles: Vec<RawRole>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl RoleSource for StaticRoleSource {
    async fn fetch_roles(&self) -> Result<Vec<RawRole>> {
        Ok(self.roles.clone())
    }

    fn describe(&self) -> String {
        format!("static table ({} records)", self.roles.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_returns_table() {
        let source = StaticRoleSource::new(vec![RawRole::new("reviewer", false)]);
        let roles = source.fetch_roles().await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name.as_deref(), Some("reviewer"));
        assert!(source.describe().contains('1'));
    }
}
