//! Paginator tests against a mock API.

use std::sync::Arc;

use followgraph_core::ListedUser;
use followgraph_fetch::{
    ApiClient, ApiToken, DelayPolicy, FetchError, FetchSettings, Paginator, RateTracker,
    ThrottlePolicy,
};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_body(logins: &[&str]) -> String {
    let items: Vec<_> = logins
        .iter()
        .map(|login| serde_json::json!({ "login": login, "id": 1 }))
        .collect();
    serde_json::Value::Array(items).to_string()
}

fn link_to(server: &MockServer, page: u32) -> String {
    format!(
        "<{}/user/following?per_page=2&page={page}>; rel=\"next\"",
        server.uri()
    )
}

fn paginator(server: &MockServer) -> Paginator {
    paginator_with(FetchSettings::for_tests(&server.uri()).with_per_page(2))
}

fn paginator_with(settings: FetchSettings) -> Paginator {
    let client = ApiClient::new(
        &settings,
        ApiToken::new("test-token"),
        Arc::new(RateTracker::new(DelayPolicy::none())),
    )
    .unwrap();
    Paginator::new(Arc::new(client), settings.per_page)
}

async fn mount_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/user/following"))
        .and(query_param_is_missing("page"))
        .and(query_param("per_page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link_to(server, 2).as_str())
                .set_body_string(page_body(&["ada", "brian"])),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/following"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link_to(server, 3).as_str())
                .set_body_string(page_body(&["carol", "dennis"])),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/following"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["edsger"])))
        .mount(server)
        .await;
}

async fn logins(paginator: &Paginator) -> Result<Vec<String>, FetchError> {
    let url = paginator.client().endpoint(&["user", "following"])?;
    let users: Vec<ListedUser> = paginator.fetch_all(&url, &[]).await?;
    Ok(users.into_iter().map(|u| u.login).collect())
}

#[tokio::test]
async fn test_collects_all_pages_in_order() {
    let server = MockServer::start().await;
    mount_pages(&server).await;

    let paginator = paginator(&server);
    let all = logins(&paginator).await.unwrap();

    assert_eq!(all, vec!["ada", "brian", "carol", "dennis", "edsger"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_throttled_page_is_retried_in_place() {
    let server = MockServer::start().await;
    // Mounted first so it wins for the first request to page 2.
    Mock::given(method("GET"))
        .and(path("/user/following"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("retry-after", "0"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_pages(&server).await;

    let paginator = paginator(&server);
    let all = logins(&paginator).await.unwrap();

    assert_eq!(all, vec!["ada", "brian", "carol", "dennis", "edsger"]);
    // Three pages plus one throttled attempt.
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_error_mid_walk_discards_partial_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/following"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"message":"Server Error"}"#),
        )
        .mount(&server)
        .await;
    mount_pages(&server).await;

    let paginator = paginator(&server);
    let err = logins(&paginator).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_persistent_throttle_gives_up_when_capped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let paginator = paginator_with(
        FetchSettings::for_tests(&server.uri())
            .with_per_page(2)
            .with_throttle(ThrottlePolicy::immediate().with_max_retries(2)),
    );
    let err = logins(&paginator).await.unwrap_err();

    assert!(matches!(err, FetchError::RateLimited { attempts: 3, .. }));
}
