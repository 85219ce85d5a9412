//! Fetch context wiring the rate tracker, client and paginator together.
//!
//! Everything that talks to the API shares one [`RateTracker`] through the
//! context, so pacing reflects every response the process has seen.

use std::sync::Arc;
use std::time::Duration;

use crate::client::{ApiClient, ApiToken};
use crate::error::FetchError;
use crate::paginator::Paginator;
use crate::rate::{DelayPolicy, RateTracker};
use crate::retry::ThrottlePolicy;

/// Default API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for API access.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// API root URL.
    pub api_base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Page size for list endpoints.
    pub per_page: u32,
    /// Pre-request pacing.
    pub delay: DelayPolicy,
    /// Waiting out throttled requests.
    pub throttle: ThrottlePolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            per_page: 100,
            delay: DelayPolicy::default(),
            throttle: ThrottlePolicy::default(),
        }
    }
}

impl FetchSettings {
    /// Settings pointed at a mock server, with no pacing and immediate
    /// throttle retries.
    pub fn for_tests(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            timeout: Duration::from_secs(5),
            per_page: 100,
            delay: DelayPolicy::none(),
            throttle: ThrottlePolicy::immediate(),
        }
    }

    /// Sets the API root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the page size.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Sets the throttle policy.
    pub fn with_throttle(mut self, throttle: ThrottlePolicy) -> Self {
        self.throttle = throttle;
        self
    }

    /// Sets the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Shared handles for API access.
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Process-wide quota state.
    pub rate: Arc<RateTracker>,
    /// Request executor.
    pub client: Arc<ApiClient>,
    /// List walker over `client`.
    pub paginator: Paginator,
    /// Settings the context was built from.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with a fresh rate tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn new(settings: FetchSettings, token: ApiToken) -> Result<Self, FetchError> {
        Self::builder().settings(settings).token(token).build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a [`FetchContext`].
#[derive(Debug, Default)]
pub struct FetchContextBuilder {
    settings: FetchSettings,
    token: Option<ApiToken>,
    rate: Option<Arc<RateTracker>>,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the credential.
    pub fn token(mut self, token: ApiToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Shares an existing rate tracker.
    pub fn rate(mut self, rate: Arc<RateTracker>) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidToken`] when no token was set, or an
    /// error if the client cannot be built.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let token = self.token.ok_or(FetchError::InvalidToken)?;
        let rate = self
            .rate
            .unwrap_or_else(|| Arc::new(RateTracker::new(self.settings.delay.clone())));
        let client = Arc::new(ApiClient::new(&self.settings, token, Arc::clone(&rate))?);
        let paginator = Paginator::new(Arc::clone(&client), self.settings.per_page);

        Ok(FetchContext {
            rate,
            client,
            paginator,
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.api_base_url, "https://api.github.com");
        assert_eq!(settings.per_page, 100);
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.throttle.max_retries, None);
    }

    #[test]
    fn test_builder_shares_tracker() {
        let ctx = FetchContext::builder()
            .settings(FetchSettings::default().with_per_page(50))
            .token(ApiToken::new("t"))
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(&ctx.rate, ctx.client.rate()));
        assert_eq!(ctx.paginator.per_page(), 50);
    }

    #[test]
    fn test_builder_requires_token() {
        let err = FetchContext::builder().build().unwrap_err();
        assert!(matches!(err, FetchError::InvalidToken));
    }

    #[test]
    fn test_bad_base_url() {
        let settings = FetchSettings::default().with_base_url("not a url");
        let err = FetchContext::new(settings, ApiToken::new("t")).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
