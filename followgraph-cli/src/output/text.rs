//! Text output formatting with progress bars and colors.

use chrono::{DateTime, Duration, Utc};
use followgraph_core::{
    AccountOverview, BulkSummary, DEFAULT_QUOTA, Identity, OperationDetail, QuotaState,
};
use followgraph_graph::BulkProgress;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Formats the relationship overview.
    pub fn format_overview(&self, overview: &AccountOverview) -> String {
        let mut lines = Vec::new();
        let snapshot = &overview.snapshot;

        let mut header = self.bold(&format!("@{}", overview.account));
        if let Some(profile) = &overview.profile {
            let name = profile.display_name();
            if name != overview.account.as_str() {
                header.push_str(&format!(" ({name})"));
            }
        }
        lines.push(header);
        lines.push("─".repeat(40));

        lines.push(format!("{:<20}{:>8}", "Following", snapshot.following_count));
        lines.push(format!("{:<20}{:>8}", "Followers", snapshot.followers_count));
        lines.push(format!(
            "{:<20}{:>8}",
            "Mutuals",
            self.green(&snapshot.mutuals.len().to_string())
        ));
        lines.push(format!(
            "{:<20}{:>8}",
            "Not following back",
            self.yellow(&snapshot.non_mutuals.len().to_string())
        ));
        lines.push(format!(
            "{:<20}{:>8}",
            "Not followed back",
            self.cyan(&snapshot.not_following_back.len().to_string())
        ));
        lines.push(format!(
            "{:<20}{:>7.1}%",
            "Follow-back ratio",
            snapshot.follow_back_ratio()
        ));

        if let Some(profile) = &overview.profile {
            lines.push(format!("{:<20}{:>8}", "Public repos", profile.public_repos));
            if let Some(bio) = profile.bio.as_deref().filter(|b| !b.trim().is_empty()) {
                lines.push(format!("{:<20}{}", "Bio", self.dim(bio.trim())));
            }
        }

        lines.push(String::new());
        lines.push(self.format_quota(&overview.quota));
        lines.push(format!("{:<8}{}ms", "Delay", overview.current_delay_ms));

        lines.join("\n")
    }

    /// Formats quota as a bar with the reset time.
    pub fn format_quota(&self, quota: &QuotaState) -> String {
        let percent =
            f64::from(quota.remaining.min(DEFAULT_QUOTA)) / f64::from(DEFAULT_QUOTA) * 100.0;
        let mut line = format!(
            "{:<8}{} {}/{}",
            "Quota",
            self.progress_bar(percent),
            quota.remaining,
            DEFAULT_QUOTA
        );
        if let Some(reset_at) = quota.reset_at {
            let when = Self::format_reset_time(reset_at);
            line.push_str(&format!(", resets {}", self.dim(&when)));
        }
        line
    }

    /// Formats a progress bar.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn progress_bar(&self, percent: f64) -> String {
        let clamped = percent.clamp(0.0, 100.0);
        let filled = ((clamped / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_percent(clamped, &bar)
    }

    /// Formats a reset time as a countdown.
    pub(crate) fn format_reset_time(resets_at: DateTime<Utc>) -> String {
        let now = Utc::now();
        if resets_at <= now {
            return "now".to_string();
        }

        let diff = resets_at - now;
        if diff < Duration::minutes(1) {
            let secs = diff.num_seconds();
            format!("in {} second{}", secs, if secs == 1 { "" } else { "s" })
        } else if diff < Duration::hours(1) {
            let mins = diff.num_minutes();
            format!("in {} minute{}", mins, if mins == 1 { "" } else { "s" })
        } else {
            let hours = diff.num_hours();
            let mins = diff.num_minutes() % 60;
            format!("in {hours}h {mins}m")
        }
    }

    /// Formats one progress report.
    pub fn format_progress(&self, progress: &BulkProgress) -> String {
        format!(
            "{} {} {} (quota {})",
            self.dim(&format!("[{}/{}]", progress.completed, progress.total)),
            progress.succeeded,
            progress.operation.past_tense(),
            progress.remaining_quota
        )
    }

    /// Formats the outcome of a bulk run, failures listed by account.
    pub fn format_summary(&self, summary: &BulkSummary) -> String {
        let mut lines = Vec::new();

        let headline = format!(
            "{} {} of {} accounts",
            capitalize(summary.operation.past_tense()),
            summary.succeeded,
            summary.attempted
        );
        lines.push(if summary.failed() == 0 {
            self.green(&headline)
        } else {
            self.yellow(&headline)
        });

        if summary.cancelled {
            lines.push(self.dim("Stopped early on request."));
        }

        // Successes that made no change
        for result in summary.results.iter().filter(|r| {
            matches!(
                r.detail,
                OperationDetail::AlreadyFollowing | OperationDetail::NotFollowing
            )
        }) {
            lines.push(self.dim(&format!("  · {}: {}", result.identity, result.detail)));
        }

        for result in summary.failures() {
            lines.push(format!("  {} {}: {}", self.red("✗"), result.identity, result.detail));
        }

        lines.join("\n")
    }

    /// Formats a titled list of accounts.
    pub fn format_identities(&self, title: &str, identities: &[Identity]) -> String {
        let mut lines = vec![format!("{} ({})", self.bold(title), identities.len())];
        lines.extend(identities.iter().map(|id| format!("  - {id}")));
        lines.join("\n")
    }

    /// Formats an error message.
    pub fn format_error(&self, context: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(context), self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_percent(&self, percent: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent < 20.0 {
            self.red(text)
        } else if percent < 50.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub(crate) fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
