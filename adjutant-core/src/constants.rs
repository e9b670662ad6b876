//! Defaults shared across the Adjutant crates.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE FRESHNESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default time-to-live of a published snapshot, in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

// ═══════════════════════════════════════════════════════════════════════════════
// ROLE SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Default request timeout for the role table endpoint, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 15;

/// User agent sent with role table requests.
pub const DEFAULT_USER_AGENT: &str = concat!("adjutant/", env!("CARGO_PKG_VERSION"));

// ═══════════════════════════════════════════════════════════════════════════════
// RECORD DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Source tag assigned to records that arrive without one.
pub const DEFAULT_RECORD_SOURCE: &str = "manual";

/// Category assigned to records that arrive without one.
pub const DEFAULT_RECORD_CATEGORY: &str = "";
