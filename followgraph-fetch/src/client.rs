//! Request executor.
//!
//! [`ApiClient::execute`] issues exactly one request and classifies the
//! result into an [`ApiOutcome`]. [`ApiClient::send`] wraps it with the
//! wait-and-retry loop for throttled requests.

use chrono::Utc;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::context::FetchSettings;
use crate::error::FetchError;
use crate::headers::{QuotaHeaders, next_link};
use crate::rate::RateTracker;
use crate::retry::ThrottlePolicy;

/// User agent string for followgraph.
const USER_AGENT: &str = concat!("followgraph/", env!("CARGO_PKG_VERSION"));

/// Media type requested from the API.
const ACCEPT: &str = "application/vnd.github+json";

/// API version header value.
const API_VERSION: &str = "2022-11-28";

// ============================================================================
// Method
// ============================================================================

/// HTTP methods used against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    /// Read a resource or list page.
    Get,
    /// Create a follow.
    Put,
    /// Remove a follow.
    Delete,
}

impl ApiMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Put => f.write_str("PUT"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

// ============================================================================
// Token
// ============================================================================

/// Bearer credential. Never printed.
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    fn header_value(&self) -> Result<HeaderValue, FetchError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0.trim()))
            .map_err(|_| FetchError::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// A successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Final request URL.
    pub url: String,
    /// HTTP status.
    pub status: u16,
    /// Raw body.
    pub body: String,
    /// Continuation link, for list endpoints.
    pub next: Option<String>,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_str(&self.body).map_err(|source| FetchError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

/// Classified result of a single request.
#[derive(Debug)]
pub enum ApiOutcome {
    /// 2xx response.
    Ok(ApiResponse),
    /// 404 on a DELETE: the resource is already gone.
    AlreadyAbsent,
    /// 429, or 403 with an exhausted quota.
    Throttled {
        /// Quota reset time, when reported.
        reset_at: Option<chrono::DateTime<Utc>>,
        /// Server-requested wait, when reported.
        retry_after: Option<Duration>,
    },
    /// Transport or client error.
    Failed(FetchError),
}

/// Result of a request after throttling has been waited out.
#[derive(Debug)]
pub enum Settled {
    /// 2xx response.
    Ok(ApiResponse),
    /// 404 on a DELETE.
    AlreadyAbsent,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ============================================================================
// API Client
// ============================================================================

/// REST client bound to one API root and one credential.
///
/// Requests are issued one at a time; concurrent callers queue on an
/// internal gate.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: ApiToken,
    rate: Arc<RateTracker>,
    throttle: ThrottlePolicy,
    gate: Mutex<()>,
}

impl ApiClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(
        settings: &FetchSettings,
        token: ApiToken,
        rate: Arc<RateTracker>,
    ) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(&settings.api_base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", settings.api_base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(settings.api_base_url.clone()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(FetchError::Setup)?;

        Ok(Self {
            http,
            base_url,
            token,
            rate,
            throttle: settings.throttle.clone(),
            gate: Mutex::new(()),
        })
    }

    /// Builds an endpoint URL from path segments, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL cannot take segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<String, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// Checks that a URL points at the configured API host.
    ///
    /// Continuation links come from the server; the credential must not
    /// follow them anywhere else.
    fn check_host(&self, url: &str) -> Result<(), FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        let same_origin = parsed.scheme() == self.base_url.scheme()
            && parsed.host_str() == self.base_url.host_str()
            && parsed.port_or_known_default() == self.base_url.port_or_known_default();
        if same_origin {
            Ok(())
        } else {
            Err(FetchError::InvalidUrl(format!("{url} is outside {}", self.base_url)))
        }
    }

    /// The shared rate tracker.
    pub fn rate(&self) -> &Arc<RateTracker> {
        &self.rate
    }

    /// The throttle policy used by [`ApiClient::send`].
    pub fn throttle(&self) -> &ThrottlePolicy {
        &self.throttle
    }

    /// Issues one request.
    ///
    /// Waits the tracker's current delay first. Never retries.
    #[instrument(skip(self, params))]
    pub async fn execute(
        &self,
        method: ApiMethod,
        url: &str,
        params: &[(String, String)],
    ) -> ApiOutcome {
        if let Err(e) = self.check_host(url) {
            return ApiOutcome::Failed(e);
        }
        let auth = match self.token.header_value() {
            Ok(value) => value,
            Err(e) => return ApiOutcome::Failed(e),
        };

        let _turn = self.gate.lock().await;

        let delay = self.rate.current_delay();
        if !delay.is_zero() {
            debug!(?delay, "Pacing before request");
            tokio::time::sleep(delay).await;
        }

        let mut request = self
            .http
            .request(method.as_reqwest(), url)
            .header(header::AUTHORIZATION, auth);
        if !params.is_empty() {
            request = request.query(params);
        }
        if method == ApiMethod::Put {
            request = request.header(header::CONTENT_LENGTH, "0");
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(error = %source, "Request failed");
                return ApiOutcome::Failed(FetchError::Transport {
                    method,
                    url: url.to_string(),
                    source,
                });
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();
        let quota = QuotaHeaders::parse(response.headers());
        self.rate.observe(&quota);
        debug!(status = %status, remaining = ?quota.remaining, "Response received");

        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && quota.remaining == Some(0))
        {
            warn!(status = %status, reset_at = ?quota.reset_at, "Request throttled");
            return ApiOutcome::Throttled {
                reset_at: quota.reset_at,
                retry_after: quota.retry_after,
            };
        }

        if status == StatusCode::NOT_FOUND && method == ApiMethod::Delete {
            debug!("Resource already absent");
            return ApiOutcome::AlreadyAbsent;
        }

        let next = next_link(response.headers());
        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => {
                return ApiOutcome::Failed(FetchError::Transport {
                    method,
                    url: final_url,
                    source,
                });
            }
        };

        if status.is_client_error() || status.is_server_error() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            warn!(status = %status, message = %message, "Request rejected");
            return ApiOutcome::Failed(FetchError::Client {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        ApiOutcome::Ok(ApiResponse {
            url: final_url,
            status: status.as_u16(),
            body,
            next,
        })
    }

    /// Issues a request, waiting out throttling and retrying the same call.
    ///
    /// # Errors
    ///
    /// Returns transport and client errors unchanged. Throttling is waited
    /// out until the call goes through, unless the policy caps retries, in
    /// which case [`FetchError::RateLimited`] is returned once the cap is hit.
    pub async fn send(
        &self,
        method: ApiMethod,
        url: &str,
        params: &[(String, String)],
    ) -> Result<Settled, FetchError> {
        let mut retries = 0;
        loop {
            match self.execute(method, url, params).await {
                ApiOutcome::Ok(response) => return Ok(Settled::Ok(response)),
                ApiOutcome::AlreadyAbsent => return Ok(Settled::AlreadyAbsent),
                ApiOutcome::Failed(e) => return Err(e),
                ApiOutcome::Throttled {
                    reset_at,
                    retry_after,
                } => {
                    if !self.throttle.can_retry(retries) {
                        return Err(FetchError::RateLimited {
                            url: url.to_string(),
                            attempts: retries + 1,
                        });
                    }
                    retries += 1;
                    let wait = self.throttle.wait_for(reset_at, retry_after, Utc::now());
                    warn!(
                        url = %url,
                        retry = retries,
                        wait_secs = wait.as_secs_f64(),
                        "Rate limit exceeded, waiting for reset"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
