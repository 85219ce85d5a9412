//! Single-account graph operations and snapshot computation.

use chrono::Utc;
use followgraph_core::{
    AccountOverview, Identity, OperationDetail, OperationResult, Relation, RelationshipSnapshot,
    UserProfile,
};
use followgraph_fetch::{ApiClient, ApiMethod, FetchError, RateTracker, Settled};
use followgraph_store::RelationshipCache;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::GraphError;

/// Follow, unfollow and lookup calls for one acting account.
#[derive(Debug)]
pub struct GraphOperations {
    client: Arc<ApiClient>,
    cache: Arc<RelationshipCache>,
    account: Identity,
}

impl GraphOperations {
    /// Creates operations acting as `account`.
    pub fn new(client: Arc<ApiClient>, cache: Arc<RelationshipCache>, account: Identity) -> Self {
        Self {
            client,
            cache,
            account,
        }
    }

    /// The acting account.
    pub fn account(&self) -> &Identity {
        &self.account
    }

    /// The relationship cache.
    pub fn cache(&self) -> &Arc<RelationshipCache> {
        &self.cache
    }

    /// The shared rate tracker.
    pub fn rate(&self) -> &Arc<RateTracker> {
        self.client.rate()
    }

    fn following_url(&self, identity: &Identity) -> Result<String, FetchError> {
        self.client.endpoint(&["user", "following", identity.as_str()])
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Fetches a profile. `None` when the account does not exist.
    ///
    /// # Errors
    ///
    /// Returns any failure other than not-found.
    #[instrument(skip(self))]
    pub async fn lookup_user(&self, identity: &Identity) -> Result<Option<UserProfile>, GraphError> {
        let url = self.client.endpoint(&["users", identity.as_str()])?;
        match self.client.send(ApiMethod::Get, &url, &[]).await {
            Ok(Settled::Ok(response)) => Ok(Some(response.json()?)),
            Ok(Settled::AlreadyAbsent) => Ok(None),
            Err(e) if e.is_not_found() => {
                debug!(identity = %identity, "No such account");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Stops following `identity`.
    ///
    /// A 404 means the follow did not exist; that is reported as
    /// [`OperationDetail::NotFollowing`] and still counts as success.
    #[instrument(skip(self))]
    pub async fn unfollow(&self, identity: &Identity) -> OperationResult {
        let url = match self.following_url(identity) {
            Ok(url) => url,
            Err(e) => return OperationResult::failed(identity.clone(), e.to_string()),
        };

        match self.client.send(ApiMethod::Delete, &url, &[]).await {
            Ok(Settled::Ok(_)) => {
                self.cache.invalidate(Relation::Following).await;
                debug!(identity = %identity, "Unfollowed");
                OperationResult::new(identity.clone(), OperationDetail::Unfollowed)
            }
            Ok(Settled::AlreadyAbsent) => {
                debug!(identity = %identity, "Was not following");
                OperationResult::new(identity.clone(), OperationDetail::NotFollowing)
            }
            Err(e) => {
                warn!(identity = %identity, error = %e, "Unfollow failed");
                OperationResult::failed(identity.clone(), e.to_string())
            }
        }
    }

    /// Starts following `identity`.
    ///
    /// Skips the call when the cached following list already holds the
    /// account, compared without regard to case. The list is read as
    /// cached; it is fetched only when nothing is cached yet. If that read
    /// fails the follow is attempted anyway.
    #[instrument(skip(self))]
    pub async fn follow(&self, identity: &Identity) -> OperationResult {
        if self.is_cached_following(identity).await {
            debug!(identity = %identity, "Already following");
            return OperationResult::new(identity.clone(), OperationDetail::AlreadyFollowing);
        }

        let url = match self.following_url(identity) {
            Ok(url) => url,
            Err(e) => return OperationResult::failed(identity.clone(), e.to_string()),
        };

        match self.client.send(ApiMethod::Put, &url, &[]).await {
            Ok(_) => {
                self.cache.invalidate(Relation::Following).await;
                debug!(identity = %identity, "Followed");
                OperationResult::new(identity.clone(), OperationDetail::Followed)
            }
            Err(e) => {
                warn!(identity = %identity, error = %e, "Follow failed");
                OperationResult::failed(identity.clone(), e.to_string())
            }
        }
    }

    async fn is_cached_following(&self, identity: &Identity) -> bool {
        if let Some(found) = self
            .cache
            .cached_any(Relation::Following, |id| id.matches(identity))
            .await
        {
            return found;
        }

        match self.cache.get(Relation::Following, false).await {
            Ok(following) => following.iter().any(|id| id.matches(identity)),
            Err(e) => {
                warn!(error = %e, "Could not read following list, following anyway");
                false
            }
        }
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// Reads both lists and derives the relationship sets.
    ///
    /// A failed profile lookup leaves `profile` empty and does not fail the
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns the error of a list that could not be read and had nothing
    /// cached.
    #[instrument(skip(self))]
    pub async fn compute_snapshot(&self, force_refresh: bool) -> Result<AccountOverview, GraphError> {
        let following = self.cache.get(Relation::Following, force_refresh).await?;
        let followers = self.cache.get(Relation::Followers, force_refresh).await?;
        let snapshot = RelationshipSnapshot::compute(&following, &followers);

        let profile = match self.lookup_user(&self.account).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(account = %self.account, error = %e, "Profile lookup failed");
                None
            }
        };

        let rate = self.rate();
        let overview = AccountOverview {
            account: self.account.clone(),
            profile,
            snapshot,
            quota: rate.quota(),
            current_delay_ms: u64::try_from(rate.current_delay().as_millis()).unwrap_or(u64::MAX),
            computed_at: Utc::now(),
        };

        info!(
            following = overview.snapshot.following_count,
            followers = overview.snapshot.followers_count,
            mutuals = overview.snapshot.mutuals.len(),
            "Snapshot computed"
        );
        Ok(overview)
    }
}
