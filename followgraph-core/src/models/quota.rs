//! Server-imposed request quota.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hourly quota granted to authenticated GitHub clients.
pub const DEFAULT_QUOTA: u32 = 5000;

/// Last known quota state.
///
/// Until the first response echoes quota headers, `remaining` holds the
/// full hourly allowance and `reset_at` is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    /// Calls left in the current window.
    pub remaining: u32,
    /// When the window resets.
    pub reset_at: Option<DateTime<Utc>>,
}

impl QuotaState {
    /// Creates a quota state.
    pub fn new(remaining: u32, reset_at: Option<DateTime<Utc>>) -> Self {
        Self {
            remaining,
            reset_at,
        }
    }

    /// Time left until the window resets, zero when already past or unknown.
    pub fn until_reset(&self, now: DateTime<Utc>) -> Duration {
        self.reset_at
            .and_then(|reset| (reset - now).to_std().ok())
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for QuotaState {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA, None)
    }
}
