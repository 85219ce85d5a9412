//! Domain models for followgraph.
//!
//! ## Submodules
//!
//! - [`identity`] - Identity and Relation
//! - [`quota`] - QuotaState
//! - [`profile`] - UserProfile and list entries
//! - [`snapshot`] - RelationshipSnapshot and AccountOverview
//! - [`operation`] - Operation results and bulk summaries

mod identity;
mod operation;
mod profile;
mod quota;
mod snapshot;

// Re-export everything at the models level
pub use identity::{Identity, Relation};
pub use operation::{BulkOperation, BulkSummary, OperationDetail, OperationResult};
pub use profile::{ListedUser, UserProfile};
pub use quota::{DEFAULT_QUOTA, QuotaState};
pub use snapshot::{AccountOverview, RelationshipSnapshot};
