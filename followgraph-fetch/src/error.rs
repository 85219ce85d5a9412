//! Fetch error types.

use thiserror::Error;

use crate::client::ApiMethod;

/// Error type for API calls.
///
/// Messages name the method, the URL and the server's reason. The
/// credential never appears in them.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, DNS, TLS or timeout failure. Not retried.
    #[error("{method} {url} failed: {source}")]
    Transport {
        /// Request method.
        method: ApiMethod,
        /// Request URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server rejected the request.
    #[error("{method} {url} returned {status}: {message}")]
    Client {
        /// Request method.
        method: ApiMethod,
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Server-supplied message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response from {url}: {source}")]
    Decode {
        /// Request URL.
        url: String,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The server kept throttling past the retry budget.
    #[error("Rate limited on {url} after {attempts} attempts")]
    RateLimited {
        /// Request URL.
        url: String,
        /// Attempts made, including the first.
        attempts: u32,
    },

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The credential cannot be sent as a header value.
    #[error("Invalid API token")]
    InvalidToken,

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Setup(#[source] reqwest::Error),
}

impl FetchError {
    /// HTTP status for client errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for a 404 response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true for network-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true if the same call might succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::RateLimited { .. } => true,
            Self::Client { status, .. } => *status >= 500,
            Self::Decode { .. } | Self::InvalidUrl(_) | Self::InvalidToken | Self::Setup(_) => false,
        }
    }
}
