//! HTTP client for GitHub's public events endpoint.
//!
//! `GithubEvents` owns the conditional-request state (one ETag per page
//! position) alongside the HTTP client, so a single instance polls one feed.
//! It translates raw responses into `FetchOutcome` values: rate-limit
//! exhaustion and cache hits are data, not errors.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, IF_NONE_MATCH, USER_AGENT};
use reqwest::StatusCode;

use crate::config::FeedConfig;
use crate::feed::{EventSource, FetchOutcome, FetchedPage, PageMetadata};
use crate::types::PageCursor;

use super::error::SourceError;
use super::headers;

const EVENTS_URL: &str = "https://api.github.com/events";
const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// An `EventSource` backed by the live GitHub API.
pub struct GithubEvents {
    http: reqwest::Client,
    per_page: u32,
    /// Last seen ETag per page position, sent back as `If-None-Match`.
    etags: HashMap<PageCursor, String>,
}

impl GithubEvents {
    /// Builds a client from the feed configuration.
    ///
    /// The auth token is installed as a sensitive default header so it never
    /// appears in logs. An empty token means unauthenticated polling, which
    /// GitHub allows at a lower rate-limit quota.
    pub fn new(config: &FeedConfig) -> Result<Self, SourceError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));
        if !config.auth_token.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.auth_token))
                .map_err(|_| SourceError::InvalidToken)?;
            auth.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, auth);
        }
        default_headers.insert(USER_AGENT, HeaderValue::from_static("github-feed"));

        let http = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            per_page: config.max_events_per_page,
            etags: HashMap::new(),
        })
    }

    async fn get_page(&mut self, cursor: PageCursor) -> Result<FetchOutcome, SourceError> {
        let mut request = self
            .http
            .get(EVENTS_URL)
            .query(&[("page", cursor.0), ("per_page", self.per_page)]);
        if let Some(etag) = self.etags.get(&cursor) {
            request = request.header(IF_NONE_MATCH, etag.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        if status == StatusCode::NOT_MODIFIED {
            // Nothing changed at this page position since the last poll.
            return Ok(FetchOutcome::Page(FetchedPage {
                events: Vec::new(),
                next: None,
                metadata: PageMetadata {
                    poll_hint: headers::poll_hint(&headers),
                    ratelimit_remaining: headers::ratelimit_remaining(&headers),
                    ratelimit_reset: headers::ratelimit_reset(&headers),
                    cache_hit: true,
                },
            }));
        }

        if rate_limit_exhausted(status, &headers) {
            let reset = headers::ratelimit_reset(&headers).unwrap_or_else(Utc::now);
            return Ok(FetchOutcome::RateLimited { reset });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(etag) = headers.get(reqwest::header::ETAG).and_then(|v| v.to_str().ok()) {
            self.etags.insert(cursor, etag.to_string());
        }

        let body = response.bytes().await?;
        let events = serde_json::from_slice(&body)?;

        Ok(FetchOutcome::Page(FetchedPage {
            events,
            next: headers::next_page(&headers),
            metadata: PageMetadata {
                poll_hint: headers::poll_hint(&headers),
                ratelimit_remaining: headers::ratelimit_remaining(&headers),
                ratelimit_reset: headers::ratelimit_reset(&headers),
                cache_hit: false,
            },
        }))
    }
}

/// Whether a response signals rate-limit exhaustion rather than a real error.
///
/// GitHub uses 429 for secondary limits and 403-with-zero-remaining for the
/// primary quota. A 403 with quota left is a genuine authorization failure
/// and is not matched here.
fn rate_limit_exhausted(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN && headers::ratelimit_remaining(headers) == Some(0)
}

impl EventSource for GithubEvents {
    async fn fetch_page(&mut self, cursor: PageCursor) -> FetchOutcome {
        match self.get_page(cursor).await {
            Ok(outcome) => outcome,
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}

impl std::fmt::Debug for GithubEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubEvents")
            .field("per_page", &self.per_page)
            .field("cached_pages", &self.etags.len())
            .finish_non_exhaustive()
    }
}
