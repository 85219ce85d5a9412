//! Entry points used by the command-line front end.
//!
//! [`FollowService`] is the only surface the CLI talks to; network and
//! cache handling stay behind it.

use followgraph_core::{AccountOverview, BulkOperation, BulkSummary, Identity};
use followgraph_fetch::FetchContext;
use followgraph_store::{ApiRelationSource, CacheStatus, RelationshipCache, Settings};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::bulk::{BulkHooks, BulkOrchestrator, BulkPacing};
use crate::error::GraphError;
use crate::operations::GraphOperations;

// ============================================================================
// Unfollow Scope
// ============================================================================

/// Which non-mutuals a bulk unfollow targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowScope {
    /// The first `n`, in following order.
    Count(usize),
    /// All of them.
    All,
}

impl UnfollowScope {
    fn select(self, candidates: Vec<Identity>) -> Vec<Identity> {
        match self {
            Self::Count(n) => candidates.into_iter().take(n).collect(),
            Self::All => candidates,
        }
    }
}

impl fmt::Display for UnfollowScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "first {n}"),
            Self::All => f.write_str("all"),
        }
    }
}

// ============================================================================
// Dry Run Preview
// ============================================================================

/// What a full unfollow would do, without doing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunPreview {
    /// Non-mutuals that would be unfollowed.
    pub total: usize,
    /// The first few of them, in following order.
    pub preview: Vec<Identity>,
    /// Accounts following back that would be kept.
    pub mutuals_kept: usize,
}

impl DryRunPreview {
    /// Non-mutuals not listed in the preview.
    pub fn hidden(&self) -> usize {
        self.total.saturating_sub(self.preview.len())
    }
}

impl fmt::Display for DryRunPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(
                f,
                "Nothing to unfollow: all {} followed accounts follow back.",
                self.mutuals_kept
            );
        }
        writeln!(
            f,
            "Would unfollow {} accounts that do not follow back ({} mutuals kept):",
            self.total, self.mutuals_kept
        )?;
        for identity in &self.preview {
            writeln!(f, "  - {identity}")?;
        }
        if self.hidden() > 0 {
            writeln!(f, "  ... and {} more", self.hidden())?;
        }
        Ok(())
    }
}

// ============================================================================
// Follow Service
// ============================================================================

/// Snapshot, preview, bulk and cache entry points for one account.
#[derive(Debug, Clone)]
pub struct FollowService {
    ops: Arc<GraphOperations>,
    bulk: BulkOrchestrator,
    preview_limit: usize,
}

impl FollowService {
    /// Creates a service over existing operations.
    pub fn new(ops: Arc<GraphOperations>, pacing: BulkPacing, preview_limit: usize) -> Self {
        let bulk = BulkOrchestrator::new(Arc::clone(&ops), pacing);
        Self {
            ops,
            bulk,
            preview_limit,
        }
    }

    /// Wires a service from a fetch context and user settings.
    pub fn from_context(ctx: &FetchContext, settings: &Settings, account: Identity) -> Self {
        let source = Arc::new(ApiRelationSource::new(ctx.paginator.clone()));
        let cache = Arc::new(RelationshipCache::new(source, settings.cache_ttl()));
        let ops = Arc::new(GraphOperations::new(Arc::clone(&ctx.client), cache, account));
        Self::new(
            ops,
            BulkPacing::from_settings(settings),
            settings.dry_run_preview_limit,
        )
    }

    /// The underlying operations.
    pub fn operations(&self) -> &Arc<GraphOperations> {
        &self.ops
    }

    /// The acting account.
    pub fn account(&self) -> &Identity {
        self.ops.account()
    }

    /// Relationship snapshot with quota and profile.
    ///
    /// # Errors
    ///
    /// Returns an error if either list cannot be read and nothing is cached.
    pub async fn get_snapshot(&self, force_refresh: bool) -> Result<AccountOverview, GraphError> {
        self.ops.compute_snapshot(force_refresh).await
    }

    /// Previews a full unfollow of non-mutuals.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be computed.
    pub async fn dry_run(&self, force_refresh: bool) -> Result<DryRunPreview, GraphError> {
        let overview = self.ops.compute_snapshot(force_refresh).await?;
        let snapshot = overview.snapshot;
        Ok(DryRunPreview {
            total: snapshot.non_mutuals.len(),
            preview: snapshot
                .non_mutuals
                .into_iter()
                .take(self.preview_limit)
                .collect(),
            mutuals_kept: snapshot.mutuals.len(),
        })
    }

    /// Unfollows non-mutuals.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be computed. Per-item
    /// failures are reported in the summary.
    #[instrument(skip(self, hooks))]
    pub async fn run_bulk_unfollow(
        &self,
        scope: UnfollowScope,
        hooks: &BulkHooks,
    ) -> Result<BulkSummary, GraphError> {
        let overview = self.ops.compute_snapshot(false).await?;
        let targets = scope.select(overview.snapshot.non_mutuals);
        if targets.is_empty() {
            info!("No non-mutuals to unfollow");
            return Ok(BulkSummary::new(BulkOperation::Unfollow));
        }
        Ok(self.bulk.run(BulkOperation::Unfollow, &targets, hooks).await)
    }

    /// Follows the given accounts in order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyInput`] for an empty list.
    #[instrument(skip(self, identities, hooks), fields(count = identities.len()))]
    pub async fn run_bulk_follow(
        &self,
        identities: &[Identity],
        hooks: &BulkHooks,
    ) -> Result<BulkSummary, GraphError> {
        if identities.is_empty() {
            return Err(GraphError::EmptyInput);
        }
        Ok(self.bulk.run(BulkOperation::Follow, identities, hooks).await)
    }

    /// Followers the account does not follow back, in followers order.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be computed.
    pub async fn follow_back_suggestions(
        &self,
        force_refresh: bool,
    ) -> Result<Vec<Identity>, GraphError> {
        Ok(self
            .ops
            .compute_snapshot(force_refresh)
            .await?
            .snapshot
            .not_following_back)
    }

    /// Drops both cached lists.
    pub async fn clear_cache(&self) {
        self.ops.cache().clear().await;
    }

    /// Counts and ages of the cached lists.
    pub async fn cache_status(&self) -> CacheStatus {
        self.ops.cache().status().await
    }
}

/// Parses a comma or whitespace separated follow list.
///
/// # Errors
///
/// Returns [`GraphError::Input`] for an invalid handle and
/// [`GraphError::EmptyInput`] when nothing remains.
pub fn parse_follow_list(input: &str) -> Result<Vec<Identity>, GraphError> {
    let identities = Identity::parse_list(input)?;
    if identities.is_empty() {
        return Err(GraphError::EmptyInput);
    }
    Ok(identities)
}
