//! Role cache with single-flight refresh.
//!
//! The snapshot, its freshness and the pending fetch handle live behind one
//! mutex. The lock is only held to decide between "serve", "attach" and
//! "start", never across an `.await`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use adjutant_core::constants::DEFAULT_CACHE_TTL_SECONDS;
use adjutant_core::error::AdjutantError;
use adjutant_core::traits::RoleSource;
use adjutant_core::types::{
    normalize_roles, AdjudicationCount, Classification, RoleRecord, RoleStats,
};

use crate::snapshot::CacheSnapshot;

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Snapshot TTL in seconds
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl CacheConfig {
    /// Creates a config with the given TTL.
    pub fn with_ttl(ttl_seconds: u64) -> Self {
        Self { ttl_seconds }
    }
}

/// Lifecycle state of the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// No fetch has succeeded since construction or the last invalidation.
    Absent,
    /// A snapshot younger than the TTL is published.
    Valid,
    /// The published snapshot has outlived the TTL.
    Stale,
    /// A fetch is in flight.
    Fetching,
}

/// Point-in-time view of the cache for observability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheStatus {
    /// Current lifecycle state
    pub state: CacheState,
    /// Roles in the published snapshot
    pub record_count: usize,
    /// Publication time of the snapshot
    pub fetched_at: Option<DateTime<Utc>>,
    /// Snapshot age in seconds
    pub age_seconds: Option<u64>,
    /// Configured TTL in seconds
    pub ttl_seconds: u64,
}

type FetchOutcome = Option<Arc<CacheSnapshot>>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

struct PendingFetch {
    id: u64,
    forced: bool,
    outcome: SharedFetch,
}

#[derive(Default)]
struct CacheSlots {
    snapshot: Option<Arc<CacheSnapshot>>,
    pending: Option<PendingFetch>,
    next_fetch_id: u64,
}

struct Inner {
    source: Arc<dyn RoleSource>,
    ttl: Duration,
    slots: Mutex<CacheSlots>,
}

impl Inner {
    fn current(&self) -> FetchOutcome {
        self.slots.lock().snapshot.clone()
    }

    fn release(&self, id: u64) {
        let mut slots = self.slots.lock();
        if slots.pending.as_ref().is_some_and(|p| p.id == id) {
            slots.pending = None;
        }
    }

    /// Performs one fetch and publishes its result.
    ///
    /// The slot is released under the same lock that publishes, so no caller
    /// can observe "no fetch pending" together with the old snapshot.
    async fn run_fetch(&self, id: u64) -> FetchOutcome {
        let started = Instant::now();
        let fetched = self.source.fetch_roles().await.map(normalize_roles);

        let mut slots = self.slots.lock();
        if slots.pending.as_ref().is_some_and(|p| p.id == id) {
            slots.pending = None;
        }

        match fetched {
            Ok(normalized) => {
                if normalized.dropped > 0 || normalized.defaulted > 0 {
                    debug!(
                        fetch_id = id,
                        dropped = normalized.dropped,
                        defaulted = normalized.defaulted,
                        "Normalized role records"
                    );
                }
                let snapshot = Arc::new(CacheSnapshot::new(normalized.records));
                slots.snapshot = Some(Arc::clone(&snapshot));
                info!(
                    fetch_id = id,
                    records = snapshot.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Published role snapshot"
                );
                Some(snapshot)
            }
            Err(err) => {
                warn!(
                    fetch_id = id,
                    source = %self.source.describe(),
                    error = %err,
                    recoverable = err.is_recoverable(),
                    "Role fetch failed, keeping previous snapshot"
                );
                slots.snapshot.clone()
            }
        }
    }
}

/// Releases a fetch's pending slot when the fetch task ends, including by
/// unwinding, so a panicking source cannot leave the cache stuck in
/// `Fetching` after every waiter has gone.
struct ReleaseOnDrop {
    inner: Arc<Inner>,
    id: u64,
}

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        self.inner.release(self.id);
    }
}

/// Shared role lookup cache.
///
/// Cheap to clone; clones share the same snapshot and pending fetch. Build one
/// per process and hand clones to every consumer.
///
/// # Refresh policy
///
/// - A valid snapshot is served without touching the network unless the
///   caller forces a refresh.
/// - Concurrent callers attach to the fetch already in flight.
/// - A forced caller arriving while an unforced fetch is in flight queues one
///   more fetch behind it instead of accepting a result that may predate the
///   event that prompted the force.
/// - [`invalidate`](Self::invalidate) does not cancel a fetch in flight; that
///   fetch still publishes when it succeeds.
#[derive(Clone)]
pub struct RoleCache {
    inner: Arc<Inner>,
}

impl RoleCache {
    /// Creates a cache with default configuration.
    pub fn new(source: Arc<dyn RoleSource>) -> Self {
        Self::with_config(source, CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(source: Arc<dyn RoleSource>, config: CacheConfig) -> Self {
        Self::with_ttl(source, Duration::from_secs(config.ttl_seconds))
    }

    /// Creates a cache with an explicit TTL.
    pub fn with_ttl(source: Arc<dyn RoleSource>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                ttl,
                slots: Mutex::new(CacheSlots::default()),
            }),
        }
    }

    /// Snapshot TTL.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FETCH COORDINATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Makes sure a snapshot is loaded and returns it.
    ///
    /// Never fails: when the fetch fails the previously published snapshot is
    /// returned, which is `None` if nothing was ever loaded.
    #[instrument(skip(self))]
    pub async fn ensure_loaded(&self, force_refresh: bool) -> Option<Arc<CacheSnapshot>> {
        let outcome = {
            let mut slots = self.inner.slots.lock();

            if !force_refresh {
                if let Some(snapshot) = slots.snapshot.as_ref().filter(|s| s.is_fresh(self.inner.ttl)) {
                    debug!(records = snapshot.len(), "Cache hit");
                    return Some(Arc::clone(snapshot));
                }
            }

            let attach = slots
                .pending
                .as_ref()
                .filter(|p| p.forced || !force_refresh)
                .map(|p| (p.id, p.outcome.clone()));

            match attach {
                Some((fetch_id, outcome)) => {
                    debug!(fetch_id, "Attaching to in-flight fetch");
                    outcome
                }
                None => self.start_fetch(&mut slots, force_refresh),
            }
        };

        outcome.await
    }

    /// Spawns a fetch and installs it as the pending one.
    ///
    /// If a fetch is already pending the new one waits for it first, so at
    /// most one request is on the wire at any time.
    fn start_fetch(&self, slots: &mut CacheSlots, forced: bool) -> SharedFetch {
        slots.next_fetch_id += 1;
        let id = slots.next_fetch_id;
        let previous = slots.pending.as_ref().map(|p| p.outcome.clone());

        if previous.is_some() {
            debug!(fetch_id = id, "Queueing forced fetch behind in-flight fetch");
        } else {
            debug!(fetch_id = id, forced, "Starting fetch");
        }

        let guard = ReleaseOnDrop {
            inner: Arc::clone(&self.inner),
            id,
        };
        let task = tokio::spawn(async move {
            if let Some(previous) = previous {
                previous.await;
            }
            guard.inner.run_fetch(guard.id).await
        });

        let inner = Arc::clone(&self.inner);
        let outcome = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    let err = AdjutantError::Internal(format!("fetch task failed: {}", join_err));
                    error!(fetch_id = id, error = %err, "Role fetch task aborted");
                    inner.current()
                }
            }
        }
        .boxed()
        .shared();

        slots.pending = Some(PendingFetch {
            id,
            forced,
            outcome: outcome.clone(),
        });
        outcome
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INVALIDATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Drops the published snapshot.
    ///
    /// A fetch already in flight is left running and publishes on success.
    pub fn invalidate(&self) {
        let mut slots = self.inner.slots.lock();
        let dropped = slots.snapshot.take().map_or(0, |s| s.len());
        info!(
            dropped_records = dropped,
            fetch_in_flight = slots.pending.is_some(),
            "Invalidated role cache"
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Currently published snapshot. Never fetches.
    pub fn get_cached(&self) -> Option<Arc<CacheSnapshot>> {
        self.inner.current()
    }

    /// Looks up a role by name in the published snapshot.
    pub fn lookup(&self, name: &str) -> Option<RoleRecord> {
        self.get_cached()?.get(name).cloned()
    }

    /// Classifies a record.
    pub fn classify(record: &RoleRecord) -> Classification {
        record.classify()
    }

    /// Looks up and classifies a role; `None` if it is not cached.
    pub fn classify_name(&self, name: &str) -> Option<Classification> {
        self.lookup(name).as_ref().map(Self::classify)
    }

    /// Per-classification totals; all zero when nothing is loaded.
    pub fn stats(&self) -> RoleStats {
        self.get_cached().map(|s| s.stats()).unwrap_or_default()
    }

    /// Counts how many of `names` the cache knows about.
    pub fn count_adjudicated<S: AsRef<str>>(&self, names: &[S]) -> AdjudicationCount {
        match self.get_cached() {
            Some(snapshot) => snapshot.count_adjudicated(names),
            None => AdjudicationCount {
                total: names.len(),
                ..AdjudicationCount::default()
            },
        }
    }

    /// Current lifecycle state and snapshot metadata.
    pub fn status(&self) -> CacheStatus {
        let slots = self.inner.slots.lock();
        let snapshot = slots.snapshot.as_ref();

        let state = if slots.pending.is_some() {
            CacheState::Fetching
        } else {
            match snapshot {
                None => CacheState::Absent,
                Some(s) if s.is_fresh(self.inner.ttl) => CacheState::Valid,
                Some(_) => CacheState::Stale,
            }
        };

        CacheStatus {
            state,
            record_count: snapshot.map_or(0, |s| s.len()),
            fetched_at: snapshot.map(|s| s.fetched_at()),
            age_seconds: snapshot.map(|s| s.age().as_secs()),
            ttl_seconds: self.inner.ttl.as_secs(),
        }
    }
}

impl std::fmt::Debug for RoleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleCache")
            .field("source", &self.inner.source.describe())
            .field("ttl", &self.inner.ttl)
            .finish()
    }
}
