//! Time-bounded cache of the acting account's relationship lists.
//!
//! Each relation has its own slot. A slot's lock is held for the whole
//! refresh, so concurrent readers of an expired slot wait for one fetch
//! instead of issuing their own.

use async_trait::async_trait;
use followgraph_core::{Identity, ListedUser, Relation};
use followgraph_fetch::{FetchError, Paginator};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;

// ============================================================================
// Relation Source
// ============================================================================

/// Produces the full list for a relation.
#[async_trait]
pub trait RelationSource: Send + Sync {
    /// Fetches every identity in `relation`, in server order.
    async fn fetch(&self, relation: Relation) -> Result<Vec<Identity>, FetchError>;
}

/// [`RelationSource`] backed by the paginated list endpoints.
#[derive(Debug, Clone)]
pub struct ApiRelationSource {
    paginator: Paginator,
}

impl ApiRelationSource {
    /// Creates a source over a paginator.
    pub fn new(paginator: Paginator) -> Self {
        Self { paginator }
    }
}

#[async_trait]
impl RelationSource for ApiRelationSource {
    async fn fetch(&self, relation: Relation) -> Result<Vec<Identity>, FetchError> {
        let segments: Vec<&str> = relation.path().split('/').collect();
        let url = self.paginator.client().endpoint(&segments)?;
        let users: Vec<ListedUser> = self.paginator.fetch_all(&url, &[]).await?;
        Ok(users.into_iter().map(ListedUser::into_identity).collect())
    }
}

// ============================================================================
// Cache Entry
// ============================================================================

#[derive(Debug, Clone)]
struct CacheEntry {
    items: Vec<Identity>,
    /// `None` once invalidated. Items stay for stale fallback.
    fetched_at: Option<Instant>,
}

impl CacheEntry {
    fn age(&self) -> Option<Duration> {
        self.fetched_at.map(|t| t.elapsed())
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.age().is_some_and(|age| age < ttl)
    }
}

// ============================================================================
// Relationship Cache
// ============================================================================

/// Cache of the following and followers lists.
pub struct RelationshipCache {
    source: Arc<dyn RelationSource>,
    ttl: Duration,
    following: Mutex<Option<CacheEntry>>,
    followers: Mutex<Option<CacheEntry>>,
}

impl RelationshipCache {
    /// Creates an empty cache.
    pub fn new(source: Arc<dyn RelationSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            following: Mutex::new(None),
            followers: Mutex::new(None),
        }
    }

    fn slot(&self, relation: Relation) -> &Mutex<Option<CacheEntry>> {
        match relation {
            Relation::Following => &self.following,
            Relation::Followers => &self.followers,
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the list for `relation`.
    ///
    /// Serves the cached list while it is younger than the TTL, unless
    /// `force_refresh` is set. When a fetch fails and an earlier list
    /// exists, that list is returned instead of the error.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when nothing was ever cached.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        relation: Relation,
        force_refresh: bool,
    ) -> Result<Vec<Identity>, StoreError> {
        let mut slot = self.slot(relation).lock().await;

        if !force_refresh {
            if let Some(entry) = slot.as_ref().filter(|e| e.is_fresh(self.ttl)) {
                debug!(
                    count = entry.items.len(),
                    age_secs = entry.age().map_or(0, |a| a.as_secs()),
                    "Cache hit"
                );
                return Ok(entry.items.clone());
            }
        }

        match self.source.fetch(relation).await {
            Ok(items) => {
                info!(relation = %relation, count = items.len(), "Relationship list refreshed");
                *slot = Some(CacheEntry {
                    items: items.clone(),
                    fetched_at: Some(Instant::now()),
                });
                Ok(items)
            }
            Err(e) => match slot.as_ref() {
                Some(entry) => {
                    warn!(
                        relation = %relation,
                        error = %e,
                        count = entry.items.len(),
                        "Refresh failed, serving stale list"
                    );
                    Ok(entry.items.clone())
                }
                None => Err(e.into()),
            },
        }
    }

    /// Tests the cached list without fetching, fresh or not.
    ///
    /// Returns `None` when nothing has been cached for `relation`.
    pub async fn cached_any<F>(&self, relation: Relation, predicate: F) -> Option<bool>
    where
        F: Fn(&Identity) -> bool,
    {
        self.slot(relation)
            .lock()
            .await
            .as_ref()
            .map(|entry| entry.items.iter().any(predicate))
    }

    /// Marks `relation` as expired. Its items remain for stale fallback.
    pub async fn invalidate(&self, relation: Relation) {
        if let Some(entry) = self.slot(relation).lock().await.as_mut() {
            entry.fetched_at = None;
            debug!(relation = %relation, "Cache entry invalidated");
        }
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        for relation in Relation::all() {
            *self.slot(*relation).lock().await = None;
        }
        info!("Relationship cache cleared");
    }

    /// Per-relation counts and ages.
    pub async fn status(&self) -> CacheStatus {
        let mut entries = Vec::new();
        for relation in Relation::all() {
            if let Some(entry) = self.slot(*relation).lock().await.as_ref() {
                entries.push(EntryStatus {
                    relation: *relation,
                    count: entry.items.len(),
                    age_secs: entry.age().map(|a| a.as_secs()),
                    fresh: entry.is_fresh(self.ttl),
                });
            }
        }
        CacheStatus {
            ttl_secs: self.ttl.as_secs(),
            entries,
        }
    }
}

impl fmt::Debug for RelationshipCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Cache Status
// ============================================================================

/// State of one cached relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStatus {
    /// Which list.
    pub relation: Relation,
    /// Cached identities.
    pub count: usize,
    /// Seconds since the last successful fetch; `None` once invalidated.
    pub age_secs: Option<u64>,
    /// Whether a read would be served from the cache.
    pub fresh: bool,
}

/// Snapshot of the cache contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    /// Configured time-to-live.
    pub ttl_secs: u64,
    /// Relations with a cached list.
    pub entries: Vec<EntryStatus>,
}

impl CacheStatus {
    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "Cache is empty (ttl {}s)", self.ttl_secs);
        }
        writeln!(f, "Cache (ttl {}s):", self.ttl_secs)?;
        for entry in &self.entries {
            let age = match entry.age_secs {
                Some(secs) if entry.fresh => format!("fetched {secs}s ago"),
                Some(secs) => format!("expired, fetched {secs}s ago"),
                None => "invalidated".to_string(),
            };
            writeln!(f, "  {:<10} {:>6} entries  {age}", entry.relation.label(), entry.count)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
