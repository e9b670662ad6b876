//! Request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adjutant_cache::CacheState;
use adjutant_core::badge::{render_badge, BadgeOptions, BadgeSize};
use adjutant_core::types::{AdjudicationCount, Classification, RoleRecord, RoleStats};

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct ListRolesQuery {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct BadgeQuery {
    #[serde(default)]
    pub compact: bool,
    #[serde(default)]
    pub size: BadgeSize,
}

impl From<BadgeQuery> for BadgeOptions {
    fn from(query: BadgeQuery) -> Self {
        BadgeOptions {
            compact: query.compact,
            size: query.size,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROLES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleDto {
    pub key: String,
    pub is_active: bool,
    pub is_deliverable: bool,
    pub source: String,
    pub category: String,
    pub classification: Classification,
    pub badge: String,
}

impl RoleDto {
    pub fn new(record: RoleRecord, options: &BadgeOptions) -> Self {
        let classification = record.classify();
        Self {
            badge: render_badge(Some(classification), options),
            classification,
            key: record.key,
            is_active: record.is_active,
            is_deliverable: record.is_deliverable,
            source: record.source,
            category: record.category,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RolesResponse {
    pub loaded: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub roles: Vec<RoleDto>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// AGGREGATES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub loaded: bool,
    #[serde(flatten)]
    pub stats: RoleStats,
}

#[derive(Debug, Deserialize)]
pub struct CountRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub loaded: bool,
    #[serde(flatten)]
    pub count: AdjudicationCount,
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: CacheState,
}
