//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use followgraph_core::{AccountOverview, BulkSummary, Identity, OperationDetail};
use followgraph_graph::DryRunPreview;
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a relationship overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewOutput {
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub following: usize,
    pub followers: usize,
    pub mutuals: Vec<Identity>,
    pub non_mutuals: Vec<Identity>,
    pub not_following_back: Vec<Identity>,
    pub follow_back_ratio: f64,
    pub quota: QuotaOutput,
    #[serde(serialize_with = "serialize_datetime")]
    pub computed_at: DateTime<Utc>,
}

/// Quota as last reported.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaOutput {
    pub remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub resets_at: Option<DateTime<Utc>>,
    pub current_delay_ms: u64,
}

/// JSON output for a bulk run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutput {
    pub operation: String,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub results: Vec<ResultOutput>,
}

/// One item of a bulk run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultOutput {
    pub account: String,
    pub succeeded: bool,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a relationship overview.
    pub fn format_overview(&self, overview: &AccountOverview) -> Result<String> {
        self.format(&Self::overview_to_output(overview))
    }

    /// Formats a bulk run summary.
    pub fn format_summary(&self, summary: &BulkSummary) -> Result<String> {
        self.format(&Self::summary_to_output(summary))
    }

    /// Formats a dry-run preview.
    pub fn format_preview(&self, preview: &DryRunPreview) -> Result<String> {
        self.format(preview)
    }

    fn overview_to_output(overview: &AccountOverview) -> OverviewOutput {
        let snapshot = &overview.snapshot;
        OverviewOutput {
            account: overview.account.to_string(),
            name: overview
                .profile
                .as_ref()
                .map(|p| p.display_name().to_string()),
            following: snapshot.following_count,
            followers: snapshot.followers_count,
            mutuals: snapshot.mutuals.clone(),
            non_mutuals: snapshot.non_mutuals.clone(),
            not_following_back: snapshot.not_following_back.clone(),
            follow_back_ratio: snapshot.follow_back_ratio(),
            quota: QuotaOutput {
                remaining: overview.quota.remaining,
                resets_at: overview.quota.reset_at,
                current_delay_ms: overview.current_delay_ms,
            },
            computed_at: overview.computed_at,
        }
    }

    fn summary_to_output(summary: &BulkSummary) -> SummaryOutput {
        SummaryOutput {
            operation: summary.operation.to_string(),
            attempted: summary.attempted,
            succeeded: summary.succeeded,
            failed: summary.failed(),
            cancelled: summary.cancelled,
            results: summary
                .results
                .iter()
                .map(|r| {
                    let (outcome, error) = match &r.detail {
                        OperationDetail::Failed(reason) => ("failed", Some(reason.clone())),
                        OperationDetail::Followed => ("followed", None),
                        OperationDetail::AlreadyFollowing => ("already_following", None),
                        OperationDetail::Unfollowed => ("unfollowed", None),
                        OperationDetail::NotFollowing => ("not_following", None),
                    };
                    ResultOutput {
                        account: r.identity.to_string(),
                        succeeded: r.succeeded,
                        outcome: outcome.to_string(),
                        error,
                    }
                })
                .collect(),
        }
    }
}
