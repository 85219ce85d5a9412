//! Shared harness: a mock API and a service pointed at it with no pacing.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use followgraph_core::Identity;
use followgraph_fetch::{ApiToken, FetchContext};
use followgraph_graph::{BulkOrchestrator, BulkPacing, FollowService};
use followgraph_store::Settings;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCOUNT: &str = "me";

pub struct Harness {
    pub server: MockServer,
    pub service: FollowService,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let settings = Settings {
            api_base_url: server.uri(),
            bulk_batch_size: 2,
            max_low_quota_pause_secs: 0,
            long_delay_ms: 0,
            medium_delay_ms: 0,
            short_delay_ms: 0,
            reset_buffer_secs: 0,
            min_reset_wait_secs: 0,
            ..Settings::default()
        };
        let ctx = FetchContext::new(settings.fetch_settings(), ApiToken::new("test-token")).unwrap();
        let service = FollowService::from_context(&ctx, &settings, Identity::new(ACCOUNT));
        Self { server, service }
    }

    pub fn orchestrator(&self) -> BulkOrchestrator {
        self.orchestrator_with_pause(Duration::ZERO)
    }

    /// Batches of two with the given low-quota pause cap.
    pub fn orchestrator_with_pause(&self, max_low_quota_pause: Duration) -> BulkOrchestrator {
        BulkOrchestrator::new(
            Arc::clone(self.service.operations()),
            BulkPacing {
                batch_size: 2,
                max_low_quota_pause,
            },
        )
    }

    /// Serves a single-page list at `/user/{relation}`.
    pub async fn mount_list(&self, relation: &str, logins: &[&str]) {
        Mock::given(method("GET"))
            .and(path(format!("/user/{relation}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(logins)))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_profile(&self) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{ACCOUNT}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": ACCOUNT,
                "id": 7,
                "name": "Test Account",
                "public_repos": 12,
                "followers": 3,
                "following": 3
            })))
            .mount(&self.server)
            .await;
    }

    /// Requests received with the given method and path.
    pub async fn count(&self, http_method: &str, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }
}

pub fn list_body(logins: &[&str]) -> serde_json::Value {
    serde_json::Value::Array(
        logins
            .iter()
            .map(|login| serde_json::json!({ "login": login }))
            .collect(),
    )
}

pub fn ids(names: &[&str]) -> Vec<Identity> {
    names.iter().map(Identity::new).collect()
}
