// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `followgraph` Core
//!
//! Core types and models shared by the `followgraph` crates.
//!
//! ## Key Types
//!
//! ### Identities
//! - [`Identity`] - Case-preserving account handle
//! - [`Relation`] - Following or followers
//!
//! ### Quota
//! - [`QuotaState`] - Remaining calls and reset time
//!
//! ### Relationships
//! - [`RelationshipSnapshot`] - Mutuals, non-mutuals, not-following-back
//! - [`AccountOverview`] - Snapshot plus profile and quota
//! - [`UserProfile`] - Account profile
//!
//! ### Operations
//! - [`OperationResult`] - One follow/unfollow outcome
//! - [`BulkSummary`] - Aggregated bulk run outcome

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Identities
    Identity,
    Relation,
    // Quota
    DEFAULT_QUOTA,
    QuotaState,
    // Relationships
    AccountOverview,
    ListedUser,
    RelationshipSnapshot,
    UserProfile,
    // Operations
    BulkOperation,
    BulkSummary,
    OperationDetail,
    OperationResult,
};
