// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Followgraph Graph
//!
//! Relationship analysis and follow/unfollow orchestration.
//!
//! - [`GraphOperations`] - Lookup, follow, unfollow and snapshot computation
//! - [`BulkOrchestrator`] - Sequential, paced bulk runs with partial-failure accounting
//! - [`FollowService`] - Entry points for front ends
//!
//! ## Example
//!
//! ```ignore
//! use followgraph_graph::{BulkHooks, FollowService, UnfollowScope};
//!
//! let service = FollowService::from_context(&ctx, &settings, account);
//! let preview = service.dry_run(false).await?;
//! println!("{preview}");
//! let summary = service
//!     .run_bulk_unfollow(UnfollowScope::Count(10), &BulkHooks::new())
//!     .await?;
//! ```

pub mod bulk;
pub mod error;
pub mod operations;
pub mod service;

pub use bulk::{BulkHooks, BulkOrchestrator, BulkPacing, BulkProgress};
pub use error::GraphError;
pub use operations::GraphOperations;
pub use service::{DryRunPreview, FollowService, UnfollowScope, parse_follow_list};
