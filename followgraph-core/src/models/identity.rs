//! Account identities and relation kinds.
//!
//! - [`Identity`] - Case-preserving account handle
//! - [`Relation`] - Which side of the follow graph a list describes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// ============================================================================
// Identity
// ============================================================================

/// An account handle as the server spells it.
///
/// Equality is case-sensitive. Use [`Identity::matches`] for lookups that
/// should ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wraps a handle returned by the server, exactly as spelled.
    pub fn new(login: impl AsRef<str>) -> Self {
        Self(login.as_ref().to_string())
    }

    /// Parses a handle typed by a user.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentity`] when the handle is empty or
    /// contains characters that would change the request path.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim().trim_start_matches('@');
        if trimmed.is_empty()
            || trimmed
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
        {
            return Err(CoreError::InvalidIdentity(input.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parses a comma or whitespace separated list of handles.
    ///
    /// Blank entries are skipped; order is preserved.
    ///
    /// # Errors
    ///
    /// Returns the first invalid handle encountered.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, CoreError> {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Returns the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, matching how the server resolves handles.
    pub fn matches(&self, other: &Identity) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Relation
// ============================================================================

/// One of the two identity sets kept for the acting account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Accounts the acting account follows.
    Following,
    /// Accounts that follow the acting account.
    Followers,
}

impl Relation {
    /// API path of the list endpoint, relative to the API root.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Following => "user/following",
            Self::Followers => "user/followers",
        }
    }

    /// Lowercase label used in logs and status output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Following => "following",
            Self::Followers => "followers",
        }
    }

    /// Both relations, following first.
    pub fn all() -> &'static [Relation] {
        &[Self::Following, Self::Followers]
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
