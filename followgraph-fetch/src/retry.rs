//! Waiting out throttled requests.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// How long to wait after the server throttles a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Added to the reported reset time.
    pub reset_buffer: Duration,
    /// Lower bound on any wait.
    pub min_wait: Duration,
    /// Throttle retries allowed for one call. `None` retries until the
    /// call goes through.
    pub max_retries: Option<u32>,
}

impl ThrottlePolicy {
    /// Creates a policy with the given retry budget.
    pub fn new(max_retries: Option<u32>) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// A policy that retries immediately without limit, for tests and mocks.
    pub fn immediate() -> Self {
        Self {
            reset_buffer: Duration::ZERO,
            min_wait: Duration::ZERO,
            max_retries: None,
        }
    }

    /// Caps throttle retries on one call.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the reset buffer.
    pub fn with_reset_buffer(mut self, buffer: Duration) -> Self {
        self.reset_buffer = buffer;
        self
    }

    /// Sets the minimum wait.
    pub fn with_min_wait(mut self, wait: Duration) -> Self {
        self.min_wait = wait;
        self
    }

    /// Wait before retrying a throttled request.
    ///
    /// Uses `reset_at + reset_buffer` when the reset time is known, else the
    /// server's `Retry-After`, else the buffer alone. Never below `min_wait`.
    pub fn wait_for(
        &self,
        reset_at: Option<DateTime<Utc>>,
        retry_after: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Duration {
        let until_reset = reset_at
            .map(|reset| (reset - now).to_std().unwrap_or(Duration::ZERO) + self.reset_buffer);
        let wait = until_reset
            .or(retry_after)
            .unwrap_or(self.reset_buffer);
        wait.max(self.min_wait)
    }

    /// Returns true if another retry is allowed after `retries` retries.
    pub fn can_retry(&self, retries: u32) -> bool {
        self.max_retries.is_none_or(|max| retries < max)
    }
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            reset_buffer: Duration::from_secs(5),
            min_wait: Duration::from_secs(1),
            max_retries: None,
        }
    }
}
