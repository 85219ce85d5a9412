//! Graph error types.

use followgraph_core::CoreError;
use followgraph_fetch::FetchError;
use followgraph_store::StoreError;
use thiserror::Error;

/// Errors surfaced by graph operations and the service entry points.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A single API call failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A relationship list could not be read and nothing was cached.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// User input could not be parsed.
    #[error(transparent)]
    Input(#[from] CoreError),

    /// No identities were given to a bulk follow.
    #[error("No accounts to follow")]
    EmptyInput,
}

impl GraphError {
    /// Returns true if retrying later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GraphError::Fetch(e) => e.is_transient(),
            GraphError::Store(e) => e.is_transient(),
            GraphError::Input(_) | GraphError::EmptyInput => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let throttled = GraphError::Fetch(FetchError::RateLimited {
            url: "https://api.github.com/user/following/octocat".into(),
            attempts: 11,
        });
        assert!(throttled.is_transient());
        assert!(!GraphError::EmptyInput.is_transient());
        assert!(!GraphError::Input(CoreError::InvalidIdentity("a/b".into())).is_transient());
    }
}
