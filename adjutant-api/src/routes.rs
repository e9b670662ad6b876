//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Role queries
        .route("/api/v1/roles", get(handlers::list_roles))
        .route("/api/v1/roles/:name", get(handlers::get_role))
        .route("/api/v1/stats", get(handlers::get_stats))
        .route("/api/v1/adjudications/count", post(handlers::count_adjudicated))

        // Cache control
        .route("/api/v1/cache", get(handlers::cache_status))
        .route("/api/v1/cache/invalidate", post(handlers::invalidate_cache))
        .route("/api/v1/cache/refresh", post(handlers::refresh_cache))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use adjutant_core::traits::StaticRoleSource;
    use adjutant_core::types::RawRole;

    use crate::state::ApiConfig;

    fn test_state() -> Arc<AppState> {
        let source = StaticRoleSource::new(vec![
            RawRole::new("Project Manager", true).deliverable(true),
            RawRole::new("Reviewer", false).deliverable(false),
            RawRole::new("QA Engineer", true).category("engineering"),
        ]);
        Arc::new(AppState::with_source(ApiConfig::default(), Arc::new(source)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(create_router(test_state()), get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cache"], "absent");
    }

    #[tokio::test]
    async fn test_list_roles() {
        let (status, body) = send(create_router(test_state()), get_request("/api/v1/roles")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loaded"], true);
        assert_eq!(body["total"], 3);
        assert_eq!(body["roles"][0]["key"], "project manager");
    }

    #[tokio::test]
    async fn test_get_role_with_badge() {
        let state = test_state();

        let (status, body) = send(
            create_router(state.clone()),
            get_request("/api/v1/roles/PROJECT%20MANAGER"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["classification"], "deliverable");
        assert_eq!(body["badge"], "Deliverable");

        let (_, body) = send(
            create_router(state),
            get_request("/api/v1/roles/reviewer?compact=true&size=small"),
        )
        .await;
        assert_eq!(body["classification"], "rejected");
        assert_eq!(body["badge"], "r");
    }

    #[tokio::test]
    async fn test_get_unknown_role() {
        let (status, body) = send(
            create_router(test_state()),
            get_request("/api/v1/roles/unknown%20role"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_stats() {
        let (status, body) = send(create_router(test_state()), get_request("/api/v1/stats")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["deliverable"], 1);
        assert_eq!(body["confirmed"], 1);
        assert_eq!(body["rejected"], 1);
    }

    #[tokio::test]
    async fn test_count_adjudicated() {
        let request = post_request(
            "/api/v1/adjudications/count",
            serde_json::json!({ "names": ["project manager", "reviewer", "ghost role"] }),
        );
        let (status, body) = send(create_router(test_state()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["adjudicated"], 2);
        assert_eq!(body["total"], 3);
        assert_eq!(body["confirmed"], 1);
        assert_eq!(body["rejected"], 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reads_agree_with_loaded_flag_under_invalidation() {
        let state = test_state();

        let invalidator = {
            let state = state.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    state.cache.invalidate();
                    tokio::task::yield_now().await;
                }
            })
        };

        for _ in 0..100 {
            let (_, stats) = send(create_router(state.clone()), get_request("/api/v1/stats")).await;
            if stats["loaded"] == true {
                assert_eq!(stats["total"], 3);
            }

            let request = post_request(
                "/api/v1/adjudications/count",
                serde_json::json!({ "names": ["project manager", "reviewer"] }),
            );
            let (_, count) = send(create_router(state.clone()), request).await;
            if count["loaded"] == true {
                assert_eq!(count["adjudicated"], 2);
            }
        }

        invalidator.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_then_status() {
        let state = test_state();
        send(create_router(state.clone()), get_request("/api/v1/stats")).await;
        assert!(state.cache.get_cached().is_some());

        let (status, _) = send(
            create_router(state.clone()),
            post_request("/api/v1/cache/invalidate", Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.cache.get_cached().is_none());

        let (_, body) = send(create_router(state), get_request("/api/v1/cache")).await;
        assert_eq!(body["state"], "absent");
        assert_eq!(body["record_count"], 0);
    }

    #[tokio::test]
    async fn test_refresh_loads_snapshot() {
        let (status, body) = send(
            create_router(test_state()),
            post_request("/api/v1/cache/refresh", Value::Null),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "valid");
        assert_eq!(body["record_count"], 3);
    }
}
