//! Error types for Adjutant.
//!
//! Fetch errors fall into two families: transport failures (the endpoint was
//! unreachable or answered with a non-success status) and parse failures (the
//! body was not a role table). The cache absorbs both; they only surface
//! through logs and through the role source API itself.

use thiserror::Error;

/// Result type alias using `AdjutantError`.
pub type Result<T> = std::result::Result<T, AdjutantError>;

/// Main error type for all Adjutant operations.
#[derive(Debug, Error)]
pub enum AdjutantError {
    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The role source could not be reached.
    #[error("Role source unreachable: {0}")]
    TransportFailure(String),

    /// The role source answered with a non-success status.
    #[error("Role source at '{url}' returned HTTP {status}")]
    HttpStatus { status: u16, url: String },

    /// The request did not complete within the client timeout.
    #[error("Role source request timed out: {0}")]
    Timeout(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // PARSE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The response body was not a role table.
    #[error("Malformed role payload: {0}")]
    ParseFailure(String),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The role source URL could not be parsed.
    #[error("Invalid role source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal invariant violation, such as a fetch task that panicked.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdjutantError {
    /// Returns true if the endpoint could not be reached or refused the request.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            AdjutantError::TransportFailure(_)
                | AdjutantError::HttpStatus { .. }
                | AdjutantError::Timeout(_)
        )
    }

    /// Returns true if the endpoint answered but the body was unusable.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, AdjutantError::ParseFailure(_) | AdjutantError::Json(_))
    }

    /// Returns true if a later fetch could plausibly succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AdjutantError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            AdjutantError::TransportFailure(_) | AdjutantError::Timeout(_) => true,
            _ => false,
        }
    }
}
