//! Hosting API client
//!
//! Minimal REST client that issues one GET per call and exposes the `rel="next"` link as a
//! continuation token.

use super::transport::{ContinuationToken, Endpoint, Response, Target, Transport};
use super::ActivityError;
use chrono::{DateTime, Utc};
use core::time::Duration;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use url::Url;

const LOG_TARGET: &str = "    client";

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: u64,
    pub reset_at: DateTime<Utc>,
}

/// Hosting API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new client with an optional access token, the API root, and a per-request deadline.
    pub fn new(token: Option<&str>, base_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let _ = Url::parse(&base_url).map_err(|e| ohno::app_err!("invalid API URL '{base_url}': {e}"))?;

        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder()
            .user_agent("repo-pulse")
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &Endpoint) -> Result<Url, ActivityError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint.path()))?;
        if !endpoint.query().is_empty() {
            let _ = url
                .query_pairs_mut()
                .extend_pairs(endpoint.query().iter().map(|(name, value)| (*name, value.as_str())));
        }
        Ok(url)
    }
}

impl Transport for Client {
    async fn get(&self, target: Target<'_>) -> Result<Response, ActivityError> {
        let url = match target {
            Target::Endpoint(endpoint) => self.endpoint_url(endpoint)?,
            Target::Continuation(token) => Url::parse(token.as_str())?,
        };

        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ActivityError::Transport { url: url.to_string(), source })?;

        if let Some(rate_limit) = extract_rate_limit_from_headers(resp.headers()) {
            log::debug!(
                target: LOG_TARGET,
                "{} request(s) remaining, quota resets at {}",
                rate_limit.remaining,
                rate_limit.reset_at.with_timezone(&chrono::Local).format("%T")
            );
        }

        let status = resp.status();
        if !status.is_success() {
            log::warn!(target: LOG_TARGET, "HTTP {status} for {}", url.path());
            return Err(ActivityError::ServerError {
                status: Some(status.as_u16()),
                detail: format!("HTTP {status} from {}", url.path()),
            });
        }

        let next = resp
            .headers()
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(next_page_link)
            .map(ContinuationToken::new);

        let body = resp
            .bytes()
            .await
            .map_err(|source| ActivityError::Transport { url: url.to_string(), source })?;

        Ok(Response { body: body.to_vec(), next })
    }
}

/// Extract the `rel="next"` target from a `Link` header value.
fn next_page_link(link_header: &str) -> Option<&str> {
    link_header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| param.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target.strip_prefix('<')?.strip_suffix('>')
    })
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<u64>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}
