// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Followgraph Store
//!
//! State kept across calls within one process, plus settings on disk.
//!
//! - [`RelationshipCache`] - TTL cache of the following and followers lists,
//!   with stale fallback when a refresh fails
//! - [`SettingsStore`] - User preferences persisted as JSON
//!
//! ## Example
//!
//! ```ignore
//! use followgraph_store::{ApiRelationSource, RelationshipCache, SettingsStore};
//!
//! let settings = SettingsStore::load_default().await?.get().await;
//! let source = Arc::new(ApiRelationSource::new(ctx.paginator.clone()));
//! let cache = RelationshipCache::new(source, settings.cache_ttl());
//! let following = cache.get(Relation::Following, false).await?;
//! ```

pub mod error;
pub mod persistence;
pub mod relationship_cache;
pub mod settings_store;


pub use error::StoreError;
pub use persistence::{default_config_dir, default_settings_path};
pub use relationship_cache::{
    ApiRelationSource, CacheStatus, EntryStatus, RelationSource, RelationshipCache,
};
pub use settings_store::{LogLevel, Settings, SettingsStore};
