// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Followgraph Fetch
//!
//! Rate-limit aware access to the GitHub REST API.
//!
//! ## Request Execution
//!
//! - [`rate::RateTracker`] - Last reported quota and the pacing delay it implies
//! - [`client::ApiClient`] - Issues one request at a time and classifies the result
//! - [`retry::ThrottlePolicy`] - How long to wait when the server throttles
//!
//! ## Pagination
//!
//! - [`paginator::Paginator`] - Walks `Link: rel="next"` chains to the end
//!
//! ## Example
//!
//! ```ignore
//! use followgraph_fetch::{ApiToken, FetchContext, FetchSettings};
//!
//! let ctx = FetchContext::new(FetchSettings::default(), ApiToken::new(token))?;
//! let url = ctx.client.endpoint(&["user", "followers"])?;
//! let followers: Vec<ListedUser> = ctx.paginator.fetch_all(&url, &[]).await?;
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod headers;
pub mod paginator;
pub mod rate;
pub mod retry;

// Errors
pub use error::FetchError;

// Request execution
pub use client::{ApiClient, ApiMethod, ApiOutcome, ApiResponse, ApiToken, Settled};
pub use headers::QuotaHeaders;
pub use rate::{DelayPolicy, RateTracker};
pub use retry::ThrottlePolicy;

// Pagination & context
pub use context::{DEFAULT_API_BASE_URL, FetchContext, FetchContextBuilder, FetchSettings};
pub use paginator::Paginator;
