//! Follow/unfollow operation results.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::identity::Identity;

// ============================================================================
// Bulk Operation
// ============================================================================

/// A mutating graph operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    /// Start following an account.
    Follow,
    /// Stop following an account.
    Unfollow,
}

impl BulkOperation {
    /// Past-tense verb for summaries.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Follow => "followed",
            Self::Unfollow => "unfollowed",
        }
    }
}

impl fmt::Display for BulkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Follow => f.write_str("follow"),
            Self::Unfollow => f.write_str("unfollow"),
        }
    }
}

// ============================================================================
// Operation Result
// ============================================================================

/// How a single operation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum OperationDetail {
    /// The follow was created.
    Followed,
    /// The follow already existed in the cached following list; no call was made.
    AlreadyFollowing,
    /// The follow was removed.
    Unfollowed,
    /// The server reported no such follow. Counted as success.
    NotFollowing,
    /// The operation failed.
    Failed(String),
}

impl OperationDetail {
    /// Returns true for every outcome except [`OperationDetail::Failed`].
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for OperationDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Followed => f.write_str("followed"),
            Self::AlreadyFollowing => f.write_str("already following"),
            Self::Unfollowed => f.write_str("unfollowed"),
            Self::NotFollowing => f.write_str("was not following"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Result of one operation on one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Target identity.
    pub identity: Identity,
    /// Whether the operation counts as successful.
    pub succeeded: bool,
    /// Outcome detail.
    pub detail: OperationDetail,
}

impl OperationResult {
    /// Creates a result; `succeeded` is derived from the detail.
    pub fn new(identity: Identity, detail: OperationDetail) -> Self {
        Self {
            identity,
            succeeded: detail.is_success(),
            detail,
        }
    }

    /// Creates a failed result.
    pub fn failed(identity: Identity, reason: impl Into<String>) -> Self {
        Self::new(identity, OperationDetail::Failed(reason.into()))
    }
}

// ============================================================================
// Bulk Summary
// ============================================================================

/// Outcome of a bulk run, with per-identity results in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSummary {
    /// The operation that was run.
    pub operation: BulkOperation,
    /// Items processed.
    pub attempted: usize,
    /// Items that succeeded.
    pub succeeded: usize,
    /// Whether the run stopped early on request.
    pub cancelled: bool,
    /// Per-identity results, in input order.
    pub results: Vec<OperationResult>,
}

impl BulkSummary {
    /// Creates an empty summary.
    pub fn new(operation: BulkOperation) -> Self {
        Self {
            operation,
            attempted: 0,
            succeeded: 0,
            cancelled: false,
            results: Vec::new(),
        }
    }

    /// Records one result.
    pub fn record(&mut self, result: OperationResult) {
        self.attempted += 1;
        if result.succeeded {
            self.succeeded += 1;
        }
        self.results.push(result);
    }

    /// Items that failed.
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    /// Failed results, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &OperationResult> {
        self.results.iter().filter(|r| !r.succeeded)
    }
}
