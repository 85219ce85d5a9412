//! Full-collection retrieval over `Link`-paginated list endpoints.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::client::{ApiClient, ApiMethod, Settled};
use crate::error::FetchError;

/// Page size parameter name.
const PER_PAGE: &str = "per_page";

/// Walks every page of a list endpoint.
///
/// Throttled pages are retried in place through [`ApiClient::send`], so
/// no page is skipped or fetched twice on success.
#[derive(Debug, Clone)]
pub struct Paginator {
    client: Arc<ApiClient>,
    per_page: u32,
}

impl Paginator {
    /// Creates a paginator with the given page size.
    pub fn new(client: Arc<ApiClient>, per_page: u32) -> Self {
        Self {
            client,
            per_page: per_page.max(1),
        }
    }

    /// The underlying client.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Page size requested on the first call.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Fetches every item of the collection at `url`, in server order.
    ///
    /// `params` and the page size go on the first request only; later
    /// requests use the continuation link verbatim.
    ///
    /// # Errors
    ///
    /// Returns the first non-throttle error. Items gathered before it are
    /// discarded.
    #[instrument(skip(self, params))]
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<Vec<T>, FetchError> {
        let mut first_params = params.to_vec();
        if !first_params.iter().any(|(key, _)| key == PER_PAGE) {
            first_params.push((PER_PAGE.to_string(), self.per_page.to_string()));
        }

        let mut items = Vec::new();
        let mut current = url.to_string();
        let mut page_params = first_params;
        let mut pages = 0_u32;

        loop {
            let response = match self.client.send(ApiMethod::Get, &current, &page_params).await? {
                Settled::Ok(response) => response,
                Settled::AlreadyAbsent => break,
            };
            pages += 1;

            let page: Vec<T> = response.json()?;
            let count = page.len();
            items.extend(page);
            debug!(page = pages, items = count, total = items.len(), "Fetched page");

            match response.next {
                Some(next) if next != current => {
                    current = next;
                    page_params = Vec::new();
                }
                _ => break,
            }
        }

        info!(pages, total = items.len(), "Collection complete");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiToken;
    use crate::context::FetchSettings;
    use crate::rate::{DelayPolicy, RateTracker};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, serde::Deserialize)]
    struct Item {
        login: String,
    }

    fn paginator_for(server: &MockServer, per_page: u32) -> Paginator {
        let settings = FetchSettings::for_tests(&server.uri());
        let client = ApiClient::new(
            &settings,
            ApiToken::new("t"),
            Arc::new(RateTracker::new(DelayPolicy::none())),
        )
        .unwrap();
        Paginator::new(Arc::new(client), per_page)
    }

    #[tokio::test]
    async fn test_single_page_without_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/followers"))
            .and(query_param("per_page", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[{"login":"a"},{"login":"b"}]"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let paginator = paginator_for(&server, 100);
        let url = paginator.client().endpoint(&["user", "followers"]).unwrap();
        let items: Vec<Item> = paginator.fetch_all(&url, &[]).await.unwrap();

        let logins: Vec<_> = items.iter().map(|i| i.login.as_str()).collect();
        assert_eq!(logins, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let paginator = paginator_for(&server, 100);
        let url = paginator.client().endpoint(&["user", "following"]).unwrap();
        let items: Vec<Item> = paginator.fetch_all(&url, &[]).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_decode_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"not":"a list"}"#))
            .mount(&server)
            .await;

        let paginator = paginator_for(&server, 100);
        let url = paginator.client().endpoint(&["user", "following"]).unwrap();
        let err = paginator.fetch_all::<Item>(&url, &[]).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_self_referencing_link_stops() {
        let server = MockServer::start().await;
        let url = format!("{}/user/following", server.uri());
        let link = format!("<{url}>; rel=\"next\"");
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", link.as_str())
                    .set_body_string(r#"[{"login":"a"}]"#),
            )
            .mount(&server)
            .await;

        let paginator = paginator_for(&server, 100);
        let items: Vec<Item> = paginator.fetch_all(&url, &[]).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}
