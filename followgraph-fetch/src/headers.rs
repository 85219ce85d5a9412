//! Response metadata parsing.
//!
//! - Quota headers (`X-RateLimit-Remaining`, `X-RateLimit-Reset`, `Retry-After`)
//! - `Link` header continuation (`rel="next"`)

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, LINK, RETRY_AFTER};
use std::time::Duration;

const REMAINING: &str = "x-ratelimit-remaining";
const RESET: &str = "x-ratelimit-reset";

// ============================================================================
// Quota Headers
// ============================================================================

/// Quota metadata echoed by a response. Every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaHeaders {
    /// Calls left in the current window.
    pub remaining: Option<u32>,
    /// Window reset time (from epoch seconds).
    pub reset_at: Option<DateTime<Utc>>,
    /// Server-requested wait before retrying.
    pub retry_after: Option<Duration>,
}

impl QuotaHeaders {
    /// Parses quota headers from a header map.
    pub fn parse(headers: &HeaderMap) -> Self {
        let remaining = header_str(headers, REMAINING).and_then(|v| v.parse().ok());
        let reset_at = header_str(headers, RESET)
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
        let retry_after = header_str(headers, RETRY_AFTER.as_str())
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            remaining,
            reset_at,
            retry_after,
        }
    }

    /// Returns true when no quota header was present.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_none() && self.reset_at.is_none() && self.retry_after.is_none()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

// ============================================================================
// Link Header
// ============================================================================

/// Extracts the `rel="next"` target from a `Link` header.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(parse_next)
}

/// Parses `<url>; rel="next", <url>; rel="last"` and returns the next URL.
fn parse_next(value: &str) -> Option<String> {
    value.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = pieces.any(|param| {
            let Some((key, val)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && val
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });
        is_next.then(|| url.to_string())
    })
}
