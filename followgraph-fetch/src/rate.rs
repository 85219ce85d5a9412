//! Quota tracking and adaptive pacing.
//!
//! [`RateTracker`] keeps the last quota state the server reported and
//! turns it into a pre-request delay through a [`DelayPolicy`].

use followgraph_core::QuotaState;
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

use crate::headers::QuotaHeaders;

// ============================================================================
// Delay Policy
// ============================================================================

/// Step function from remaining quota to pacing delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayPolicy {
    /// At or below this many remaining calls, use `long_delay`.
    pub low_water: u32,
    /// At or below this many remaining calls, use `medium_delay`.
    pub secondary: u32,
    /// Delay near quota exhaustion.
    pub long_delay: Duration,
    /// Delay when quota is getting low.
    pub medium_delay: Duration,
    /// Delay in normal operation.
    pub short_delay: Duration,
}

impl DelayPolicy {
    /// A policy that never waits.
    pub fn none() -> Self {
        Self {
            long_delay: Duration::ZERO,
            medium_delay: Duration::ZERO,
            short_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay for the given remaining quota.
    ///
    /// Boundaries resolve to the longer delay.
    pub fn delay_for(&self, remaining: u32) -> Duration {
        if remaining <= self.low_water {
            self.long_delay
        } else if remaining <= self.secondary {
            self.medium_delay
        } else {
            self.short_delay
        }
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            low_water: 100,
            secondary: 1000,
            long_delay: Duration::from_secs(2),
            medium_delay: Duration::from_secs(1),
            short_delay: Duration::from_millis(200),
        }
    }
}

// ============================================================================
// Rate Tracker
// ============================================================================

/// Holder of the process-wide quota state.
///
/// Writes happen only through [`RateTracker::observe`]; the lock is never
/// held across an await point.
#[derive(Debug)]
pub struct RateTracker {
    state: RwLock<QuotaState>,
    policy: DelayPolicy,
}

impl RateTracker {
    /// Creates a tracker with the default quota state.
    pub fn new(policy: DelayPolicy) -> Self {
        Self::with_state(policy, QuotaState::default())
    }

    /// Creates a tracker seeded with a known state.
    pub fn with_state(policy: DelayPolicy, state: QuotaState) -> Self {
        Self {
            state: RwLock::new(state),
            policy,
        }
    }

    /// Updates the state from response metadata.
    ///
    /// Absent headers leave the corresponding field untouched.
    pub fn observe(&self, headers: &QuotaHeaders) {
        if headers.remaining.is_none() && headers.reset_at.is_none() {
            return;
        }

        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(remaining) = headers.remaining {
            state.remaining = remaining;
        }
        if let Some(reset_at) = headers.reset_at {
            state.reset_at = Some(reset_at);
        }
        debug!(remaining = state.remaining, reset_at = ?state.reset_at, "Quota updated");
    }

    /// Current quota state.
    pub fn quota(&self) -> QuotaState {
        *self
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Pacing delay for the current state.
    pub fn current_delay(&self) -> Duration {
        self.policy.delay_for(self.quota().remaining)
    }

    /// Returns true when remaining quota is below the low-water threshold.
    pub fn is_low(&self) -> bool {
        self.quota().remaining < self.policy.low_water
    }

    /// The configured delay policy.
    pub fn policy(&self) -> &DelayPolicy {
        &self.policy
    }
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new(DelayPolicy::default())
    }
}
