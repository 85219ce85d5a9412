//! Relationship snapshot types.
//!
//! - [`RelationshipSnapshot`] - Mutuals, non-mutuals and not-following-back
//! - [`AccountOverview`] - Snapshot plus quota and profile metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::identity::Identity;
use super::profile::UserProfile;
use super::quota::QuotaState;

// ============================================================================
// Relationship Snapshot
// ============================================================================

/// Set relationships between the following and followers lists.
///
/// The three categories are pairwise disjoint. Together with the input
/// lists they satisfy `mutuals ∪ non_mutuals = following` and
/// `mutuals ∪ not_following_back = followers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    /// Distinct identities in the following list.
    pub following_count: usize,
    /// Distinct identities in the followers list.
    pub followers_count: usize,
    /// Followed and following back, in following order.
    pub mutuals: Vec<Identity>,
    /// Followed but not following back, in following order.
    pub non_mutuals: Vec<Identity>,
    /// Following but not followed back, in followers order.
    pub not_following_back: Vec<Identity>,
}

impl RelationshipSnapshot {
    /// Computes the snapshot from the two lists.
    ///
    /// Duplicates within a list are collapsed; the first occurrence keeps
    /// its position.
    pub fn compute(following: &[Identity], followers: &[Identity]) -> Self {
        let following_set: HashSet<&Identity> = following.iter().collect();
        let followers_set: HashSet<&Identity> = followers.iter().collect();

        let mut seen = HashSet::new();
        let mut mutuals = Vec::new();
        let mut non_mutuals = Vec::new();
        for id in following {
            if !seen.insert(id) {
                continue;
            }
            if followers_set.contains(id) {
                mutuals.push(id.clone());
            } else {
                non_mutuals.push(id.clone());
            }
        }

        let mut seen = HashSet::new();
        let not_following_back = followers
            .iter()
            .filter(|id| seen.insert(*id) && !following_set.contains(id))
            .cloned()
            .collect();

        Self {
            following_count: following_set.len(),
            followers_count: followers_set.len(),
            mutuals,
            non_mutuals,
            not_following_back,
        }
    }

    /// Followers per followed account, as a percentage.
    #[allow(clippy::cast_precision_loss)]
    pub fn follow_back_ratio(&self) -> f64 {
        self.followers_count as f64 / self.following_count.max(1) as f64 * 100.0
    }
}

// ============================================================================
// Account Overview
// ============================================================================

/// A relationship snapshot with the metadata shown next to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountOverview {
    /// The acting account.
    pub account: Identity,
    /// Profile of the acting account, when the lookup succeeded.
    pub profile: Option<UserProfile>,
    /// Derived relationship sets.
    pub snapshot: RelationshipSnapshot,
    /// Quota state after the snapshot was computed.
    pub quota: QuotaState,
    /// Pacing delay in effect after the snapshot was computed, in milliseconds.
    pub current_delay_ms: u64,
    /// When the snapshot was computed.
    pub computed_at: DateTime<Utc>,
}
