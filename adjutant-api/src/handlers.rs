//! API route handlers.
//!
//! Every read handler first calls `ensure_loaded`, which never fails, and
//! answers from the snapshot it returns rather than reading the cache again,
//! so a concurrent invalidation cannot pair `loaded: true` with empty counts.
//! When the role source is down and nothing is published the handlers report
//! `loaded: false`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use adjutant_cache::{CacheSnapshot, CacheStatus};
use adjutant_core::badge::BadgeOptions;
use adjutant_core::types::AdjudicationCount;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// Largest batch accepted by the adjudication count endpoint.
const MAX_BATCH_NAMES: usize = 10_000;

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        cache: state.cache.status().state,
    })
}

/// GET /api/v1/roles
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRolesQuery>,
) -> Json<RolesResponse> {
    let snapshot = state.cache.ensure_loaded(query.refresh).await;
    let options = BadgeOptions::default();

    let response = match snapshot {
        Some(snapshot) => {
            let mut roles: Vec<RoleDto> = snapshot
                .records()
                .values()
                .cloned()
                .map(|record| RoleDto::new(record, &options))
                .collect();
            roles.sort_by(|a, b| a.key.cmp(&b.key));

            RolesResponse {
                loaded: true,
                fetched_at: Some(snapshot.fetched_at()),
                total: roles.len(),
                roles,
            }
        }
        None => RolesResponse {
            loaded: false,
            fetched_at: None,
            total: 0,
            roles: Vec::new(),
        },
    };

    Json(response)
}

/// GET /api/v1/roles/:name
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(badge): Query<BadgeQuery>,
) -> Result<Json<RoleDto>> {
    let snapshot = state.cache.ensure_loaded(false).await;

    let record = snapshot
        .as_deref()
        .and_then(|s| s.get(&name))
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("Role not cached: {}", name.trim())))?;

    debug!(key = %record.key, "Role lookup");
    let options = BadgeOptions::from(badge);
    Ok(Json(RoleDto::new(record, &options)))
}

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let snapshot = state.cache.ensure_loaded(false).await;

    Json(StatsResponse {
        loaded: snapshot.is_some(),
        stats: snapshot.as_deref().map(CacheSnapshot::stats).unwrap_or_default(),
    })
}

/// POST /api/v1/adjudications/count
pub async fn count_adjudicated(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CountRequest>,
) -> Result<Json<CountResponse>> {
    if req.names.len() > MAX_BATCH_NAMES {
        return Err(ApiError::validation(format!(
            "At most {} names per request, got {}",
            MAX_BATCH_NAMES,
            req.names.len()
        )));
    }

    let snapshot = state.cache.ensure_loaded(false).await;
    let count = match snapshot.as_deref() {
        Some(snapshot) => snapshot.count_adjudicated(&req.names),
        None => AdjudicationCount {
            total: req.names.len(),
            ..AdjudicationCount::default()
        },
    };

    debug!(total = count.total, adjudicated = count.adjudicated, "Counted adjudicated roles");
    Ok(Json(CountResponse {
        loaded: snapshot.is_some(),
        count,
    }))
}

/// GET /api/v1/cache
pub async fn cache_status(State(state): State<Arc<AppState>>) -> Json<CacheStatus> {
    Json(state.cache.status())
}

/// POST /api/v1/cache/invalidate
pub async fn invalidate_cache(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.cache.invalidate();
    info!("Cache invalidated via API");
    Json(json!({ "invalidated": true }))
}

/// POST /api/v1/cache/refresh
pub async fn refresh_cache(State(state): State<Arc<AppState>>) -> Json<CacheStatus> {
    state.cache.ensure_loaded(true).await;
    Json(state.cache.status())
}
