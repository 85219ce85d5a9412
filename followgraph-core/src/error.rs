//! Core error types for `followgraph`.

use thiserror::Error;

/// Core error type for `followgraph` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An identity was empty or contained characters a login cannot hold.
    #[error("Invalid identity: {0:?}")]
    InvalidIdentity(String),
}
