//! App state: config and the shared role cache.

use std::sync::Arc;

use adjutant_cache::{CacheConfig, RoleCache};
use adjutant_core::constants::{DEFAULT_CACHE_TTL_SECONDS, DEFAULT_HTTP_TIMEOUT_SECONDS};
use adjutant_core::error::Result;
use adjutant_core::traits::RoleSource;
use adjutant_source::{HttpRoleSource, SourceConfig};

const DEFAULT_ROLES_URL: &str = "http://127.0.0.1:8000/api/roles";

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Role table endpoint
    pub roles_url: String,
    /// Snapshot TTL in seconds
    pub cache_ttl_seconds: u64,
    /// Role table request timeout in seconds
    pub http_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            roles_url: DEFAULT_ROLES_URL.into(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
        }
    }
}

impl ApiConfig {
    /// Reads `ADJUTANT_*` variables, loading `.env` first when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let seconds = |name: &str, default: u64| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            roles_url: std::env::var("ADJUTANT_ROLES_URL").unwrap_or_else(|_| DEFAULT_ROLES_URL.into()),
            cache_ttl_seconds: seconds("ADJUTANT_CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECONDS),
            http_timeout_seconds: seconds("ADJUTANT_HTTP_TIMEOUT_SECONDS", DEFAULT_HTTP_TIMEOUT_SECONDS),
        }
    }

    /// Cache settings derived from this config.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::with_ttl(self.cache_ttl_seconds)
    }
}

/// Shared handler state.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// The process-wide role cache
    pub cache: RoleCache,
}

impl AppState {
    /// Builds state fetching from the configured HTTP endpoint.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let source = HttpRoleSource::with_config(
            SourceConfig::new(&config.roles_url).with_timeout(config.http_timeout_seconds),
        )?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Builds state around an arbitrary role source.
    pub fn with_source(config: ApiConfig, source: Arc<dyn RoleSource>) -> Self {
        let cache = RoleCache::with_config(source, config.cache_config());
        Self { config, cache }
    }
}
