//! Paced bulk follow/unfollow runs.
//!
//! Items run one at a time in input order. After each item the run waits
//! the tracker's current delay; every batch it reports progress and, when
//! quota is low, pauses toward the reset time.

use chrono::{DateTime, Utc};
use followgraph_core::{BulkOperation, BulkSummary, Identity, QuotaState, Relation};
use followgraph_fetch::RateTracker;
use followgraph_store::Settings;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::operations::GraphOperations;

// ============================================================================
// Pacing
// ============================================================================

/// Batch cadence and low-quota pause cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkPacing {
    /// Items between progress reports and quota checks.
    pub batch_size: usize,
    /// Longest low-quota pause.
    pub max_low_quota_pause: Duration,
}

impl BulkPacing {
    /// Pacing from user settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            batch_size: settings.bulk_batch_size.max(1),
            max_low_quota_pause: settings.max_low_quota_pause(),
        }
    }

    /// Pause owed at a batch boundary: the time to reset, capped, when
    /// quota is below the tracker's low-water mark.
    pub fn low_quota_pause(&self, rate: &RateTracker, now: DateTime<Utc>) -> Option<Duration> {
        if !rate.is_low() {
            return None;
        }
        let pause = rate.quota().until_reset(now).min(self.max_low_quota_pause);
        (!pause.is_zero()).then_some(pause)
    }
}

impl Default for BulkPacing {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_low_quota_pause: Duration::from_secs(30),
        }
    }
}

// ============================================================================
// Progress and Cancellation
// ============================================================================

/// Cumulative progress of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkProgress {
    /// The operation being run.
    pub operation: BulkOperation,
    /// Items processed so far.
    pub completed: usize,
    /// Items in the run.
    pub total: usize,
    /// Items that succeeded so far.
    pub succeeded: usize,
    /// Quota remaining at the time of the report.
    pub remaining_quota: u32,
}

impl fmt::Display for BulkProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} processed, {} {} (quota {})",
            self.completed,
            self.total,
            self.succeeded,
            self.operation.past_tense(),
            self.remaining_quota
        )
    }
}

type ProgressFn = Arc<dyn Fn(&BulkProgress) + Send + Sync>;

/// Caller hooks for a run: a progress callback and a cancel flag.
///
/// The flag is checked between items; an item in flight always finishes.
#[derive(Clone, Default)]
pub struct BulkHooks {
    progress: Option<ProgressFn>,
    cancel: Arc<AtomicBool>,
}

impl BulkHooks {
    /// Hooks with no callback and an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `f` at every batch boundary and after the final item.
    pub fn on_progress(mut self, f: impl Fn(&BulkProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(f));
        self
    }

    /// Uses an externally owned cancel flag.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    /// The cancel flag. Store `true` to stop before the next item.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    fn report(&self, progress: &BulkProgress) {
        if let Some(f) = &self.progress {
            f(progress);
        }
    }
}

impl fmt::Debug for BulkHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkHooks")
            .field("progress", &self.progress.is_some())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// ============================================================================
// Bulk Orchestrator
// ============================================================================

/// Runs follow/unfollow over a list of identities.
#[derive(Debug, Clone)]
pub struct BulkOrchestrator {
    ops: Arc<GraphOperations>,
    pacing: BulkPacing,
}

impl BulkOrchestrator {
    /// Creates an orchestrator.
    pub fn new(ops: Arc<GraphOperations>, pacing: BulkPacing) -> Self {
        Self { ops, pacing }
    }

    /// Runs `operation` over `identities` in order.
    ///
    /// Failed items are recorded and the run continues. Low-quota pauses
    /// happen only between batches, never after the last item. If anything
    /// succeeded, the following list is refreshed before returning.
    #[instrument(skip(self, identities, hooks), fields(total = identities.len()))]
    pub async fn run(
        &self,
        operation: BulkOperation,
        identities: &[Identity],
        hooks: &BulkHooks,
    ) -> BulkSummary {
        let total = identities.len();
        let batch_size = self.pacing.batch_size.max(1);
        let rate = self.ops.rate();
        let mut summary = BulkSummary::new(operation);

        info!(operation = %operation, total, "Starting bulk run");

        for (index, identity) in identities.iter().enumerate() {
            if hooks.is_cancelled() {
                info!(completed = summary.attempted, total, "Bulk run cancelled");
                summary.cancelled = true;
                break;
            }

            let result = match operation {
                BulkOperation::Follow => self.ops.follow(identity).await,
                BulkOperation::Unfollow => self.ops.unfollow(identity).await,
            };
            debug!(identity = %identity, detail = %result.detail, "Item done");
            summary.record(result);

            let delay = rate.current_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let completed = index + 1;
            if completed % batch_size == 0 || completed == total {
                let quota = rate.quota();
                let progress = BulkProgress {
                    operation,
                    completed,
                    total,
                    succeeded: summary.succeeded,
                    remaining_quota: quota.remaining,
                };
                info!(%progress, "Bulk progress");
                hooks.report(&progress);

                if completed < total {
                    if let Some(pause) = self.pacing.low_quota_pause(rate, Utc::now()) {
                        log_pause(&quota, pause);
                        tokio::time::sleep(pause).await;
                    }
                }
            }
        }

        if summary.succeeded > 0 {
            let cache = self.ops.cache();
            cache.invalidate(Relation::Following).await;
            if let Err(e) = cache.get(Relation::Following, true).await {
                warn!(error = %e, "Could not refresh following list after bulk run");
            }
        }

        info!(
            operation = %operation,
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            "Bulk run finished"
        );
        summary
    }
}

fn log_pause(quota: &QuotaState, pause: Duration) {
    warn!(
        remaining = quota.remaining,
        pause_secs = pause.as_secs_f64(),
        "Quota low, pausing"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use followgraph_fetch::DelayPolicy;

    fn tracker(remaining: u32, reset_in_secs: i64, now: DateTime<Utc>) -> RateTracker {
        RateTracker::with_state(
            DelayPolicy::default(),
            QuotaState::new(remaining, Some(now + chrono::Duration::seconds(reset_in_secs))),
        )
    }

    fn pacing(cap_secs: u64) -> BulkPacing {
        BulkPacing {
            batch_size: 10,
            max_low_quota_pause: Duration::from_secs(cap_secs),
        }
    }

    #[test]
    fn test_no_pause_with_healthy_quota() {
        let now = Utc::now();
        assert_eq!(pacing(30).low_quota_pause(&tracker(4000, 60, now), now), None);
    }

    #[test]
    fn test_low_quota_pause_is_capped() {
        let now = Utc::now();
        let pause = pacing(30).low_quota_pause(&tracker(5, 60, now), now);
        assert_eq!(pause, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_low_quota_pause_waits_for_near_reset() {
        let now = Utc::now();
        let pause = pacing(30).low_quota_pause(&tracker(5, 12, now), now);
        assert_eq!(pause, Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_no_pause_once_reset_passed() {
        let now = Utc::now();
        assert_eq!(pacing(30).low_quota_pause(&tracker(5, -5, now), now), None);
        assert_eq!(pacing(0).low_quota_pause(&tracker(5, 60, now), now), None);
    }
}
