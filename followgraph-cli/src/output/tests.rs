//! CLI output formatting tests.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use chrono::{Duration, Utc};
    use followgraph_core::{
        AccountOverview, BulkOperation, BulkSummary, Identity, OperationDetail, OperationResult,
        QuotaState, RelationshipSnapshot,
    };
    use followgraph_graph::BulkProgress;

    fn ids(names: &[&str]) -> Vec<Identity> {
        names.iter().map(Identity::new).collect()
    }

    fn overview() -> AccountOverview {
        let following = ids(&["a", "b", "c", "d"]);
        let followers = ids(&["a", "b", "e"]);
        AccountOverview {
            account: Identity::new("me"),
            profile: None,
            snapshot: RelationshipSnapshot::compute(&following, &followers),
            quota: QuotaState::new(2500, None),
            current_delay_ms: 0,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn test_progress_bar_empty() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(0.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_full() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(100.0), "██████████");
    }

    #[test]
    fn test_progress_bar_boundary_values() {
        let formatter = TextFormatter::new(false);

        let test_cases = vec![
            (0.0, "░░░░░░░░░░"),
            (10.0, "█░░░░░░░░░"),
            (25.0, "███░░░░░░░"), // 2.5 rounds to 3 blocks
            (50.0, "█████░░░░░"),
            (100.0, "██████████"),
            (150.0, "██████████"),
            (-5.0, "░░░░░░░░░░"),
        ];

        for (percent, expected) in test_cases {
            assert_eq!(formatter.progress_bar(percent), expected, "Failed for {percent}%");
        }
    }

    #[test]
    fn test_progress_bar_with_colors() {
        let formatter = TextFormatter::new(true);

        assert!(formatter.progress_bar(10.0).contains("\x1b[31m"), "Should be red for <20%");
        assert!(formatter.progress_bar(30.0).contains("\x1b[33m"), "Should be yellow for <50%");
        assert!(formatter.progress_bar(80.0).contains("\x1b[32m"), "Should be green for >=50%");
    }

    #[test]
    fn test_overview_counts() {
        let formatter = TextFormatter::new(false);
        let text = formatter.format_overview(&overview());

        assert!(text.starts_with("@me"));
        assert!(text.contains("Following"));
        assert!(text.contains(&format!("{:<20}{:>8}", "Mutuals", 2)));
        assert!(text.contains(&format!("{:<20}{:>8}", "Not following back", 2)));
        assert!(text.contains(&format!("{:<20}{:>8}", "Not followed back", 1)));
        assert!(text.contains("75.0%"));
        assert!(text.contains("2500/5000"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_reset_time() {
        assert_eq!(TextFormatter::format_reset_time(Utc::now() - Duration::seconds(5)), "now");

        let in_minutes = TextFormatter::format_reset_time(Utc::now() + Duration::seconds(150));
        assert!(in_minutes.starts_with("in 2 minute"), "{in_minutes}");

        let later = Utc::now() + Duration::minutes(90) + Duration::seconds(5);
        let in_hours = TextFormatter::format_reset_time(later);
        assert_eq!(in_hours, "in 1h 30m");
    }

    #[test]
    fn test_summary_lists_failures() {
        let formatter = TextFormatter::new(false);
        let mut summary = BulkSummary::new(BulkOperation::Unfollow);
        summary.record(OperationResult::new(Identity::new("a"), OperationDetail::Unfollowed));
        summary.record(OperationResult::new(Identity::new("b"), OperationDetail::NotFollowing));
        summary.record(OperationResult::failed(Identity::new("c"), "server error"));

        let text = formatter.format_summary(&summary);
        assert!(text.starts_with("Unfollowed 2 of 3 accounts"));
        assert!(text.contains("b: was not following"));
        assert!(text.contains("✗ c: failed: server error"));
        assert!(!text.contains("Stopped early"));
    }

    #[test]
    fn test_summary_cancelled() {
        let formatter = TextFormatter::new(false);
        let mut summary = BulkSummary::new(BulkOperation::Follow);
        summary.cancelled = true;
        assert!(formatter.format_summary(&summary).contains("Stopped early on request."));
    }

    #[test]
    fn test_progress_line() {
        let formatter = TextFormatter::new(false);
        let progress = BulkProgress {
            operation: BulkOperation::Follow,
            completed: 4,
            total: 10,
            succeeded: 3,
            remaining_quota: 812,
        };
        assert_eq!(formatter.format_progress(&progress), "[4/10] 3 followed (quota 812)");
    }

    #[test]
    fn test_identities_list() {
        let formatter = TextFormatter::new(false);
        let text = formatter.format_identities("Followers", &ids(&["x", "y"]));
        assert_eq!(text, "Followers (2)\n  - x\n  - y");
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use chrono::Utc;
    use followgraph_core::{
        AccountOverview, BulkOperation, BulkSummary, Identity, OperationDetail, OperationResult,
        QuotaState, RelationshipSnapshot,
    };
    use serde_json::Value;

    #[test]
    fn test_format_compact_and_pretty() {
        let data = serde_json::json!({"a": 1});
        assert_eq!(JsonFormatter::new(false).format(&data).unwrap(), r#"{"a":1}"#);
        assert!(JsonFormatter::new(true).format(&data).unwrap().contains('\n'));
    }

    #[test]
    fn test_overview_fields() {
        let following = vec![Identity::new("a"), Identity::new("b")];
        let followers = vec![Identity::new("a")];
        let overview = AccountOverview {
            account: Identity::new("me"),
            profile: None,
            snapshot: RelationshipSnapshot::compute(&following, &followers),
            quota: QuotaState::new(42, None),
            current_delay_ms: 1000,
            computed_at: Utc::now(),
        };

        let json = JsonFormatter::new(false).format_overview(&overview).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["account"], "me");
        assert_eq!(value["following"], 2);
        assert_eq!(value["nonMutuals"], serde_json::json!(["b"]));
        assert_eq!(value["quota"]["remaining"], 42);
        assert_eq!(value["quota"]["currentDelayMs"], 1000);
        assert!(value["quota"].get("resetsAt").is_none());
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_summary_fields() {
        let mut summary = BulkSummary::new(BulkOperation::Follow);
        summary.record(OperationResult::new(Identity::new("a"), OperationDetail::Followed));
        summary.record(OperationResult::failed(Identity::new("b"), "boom"));

        let json = JsonFormatter::new(false).format_summary(&summary).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["operation"], "follow");
        assert_eq!(value["failed"], 1);
        assert_eq!(value["results"][0]["outcome"], "followed");
        assert!(value["results"][0].get("error").is_none());
        assert_eq!(value["results"][1]["error"], "boom");
    }
}
