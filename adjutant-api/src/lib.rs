//! # Adjutant API Server
//!
//! REST surface over the role cache, consumed by UI glue.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness and cache state
//! - `GET /api/v1/roles` - Every cached role (`?refresh=true` forces a fetch)
//! - `GET /api/v1/roles/:name` - One role with its classification badge
//! - `GET /api/v1/stats` - Per-classification totals
//! - `POST /api/v1/adjudications/count` - Batch membership counts
//! - `GET /api/v1/cache` - Cache status
//! - `POST /api/v1/cache/invalidate` - Drop the published snapshot
//! - `POST /api/v1/cache/refresh` - Force a fetch
//!
//! ## Example
//!
//! ```rust,ignore
//! use adjutant_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env())?;
//! server.run(([0, 0, 0, 0], 3002)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::Uri, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use adjutant_core::error::Result;

/// API server for the role cache.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server fetching from the configured HTTP endpoint.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::from_state(AppState::new(config)?))
    }

    /// Creates a server around prepared state.
    pub fn from_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates the router with all routes and layers configured.
    ///
    /// Unknown paths answer with the same JSON error body as the handlers.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .fallback(|uri: Uri| async move { ApiError::not_found(format!("No route for {}", uri.path())) })
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address until Ctrl+C.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let cache = self.state.cache.clone();

        info!(
            %addr,
            source = %self.state.config.roles_url,
            ttl_seconds = self.state.config.cache_ttl_seconds,
            "Role cache API listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                if tokio::signal::ctrl_c().await.is_err() {
                    warn!("Ctrl+C handler unavailable, serving until killed");
                    std::future::pending::<()>().await;
                }
                info!(state = ?cache.status().state, "Shutting down role cache API");
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use adjutant_core::traits::StaticRoleSource;

    #[tokio::test]
    async fn test_unknown_route_returns_json_error() {
        let state = AppState::with_source(ApiConfig::default(), Arc::new(StaticRoleSource::new(Vec::new())));
        let server = ApiServer::from_state(state);

        let response = server
            .router()
            .oneshot(Request::builder().uri("/api/v2/roles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "No route for /api/v2/roles");
    }
}
