//! The boundary between the polling loop and wherever events come from.
//!
//! The trait-based design enables:
//! - Scripted sources for testing the loop without a network
//! - The live GitHub client in production
//! - Wrapping sources for logging or fault injection

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::github::SourceError;
use crate::types::{FeedEvent, PageCursor};

/// Pacing-relevant facts extracted from one response's headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    /// Server-requested minimum delay before the next poll.
    pub poll_hint: Option<Duration>,
    /// Requests left in the current rate-limit window.
    pub ratelimit_remaining: Option<u32>,
    /// When the rate-limit window resets.
    pub ratelimit_reset: Option<DateTime<Utc>>,
    /// True when the server answered 304 Not Modified for this position.
    pub cache_hit: bool,
}

/// One successfully fetched page of the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedPage {
    /// Events on this page, in feed order. Empty on a cache hit.
    pub events: Vec<FeedEvent>,
    /// The next page in this cycle's chain, or `None` on the last page.
    pub next: Option<PageCursor>,
    pub metadata: PageMetadata,
}

/// Everything a page fetch can produce.
///
/// Rate-limit exhaustion gets its own variant rather than living inside the
/// error type: the loop reacts to it by waiting, not by dying, and the
/// compiler makes sure every caller handles it.
#[derive(Debug)]
pub enum FetchOutcome {
    /// A page was fetched (possibly a cache hit with no events).
    Page(FetchedPage),
    /// The server refused the request because the quota is spent.
    RateLimited { reset: DateTime<Utc> },
    /// A fatal failure. The loop propagates these and stops.
    Failed(SourceError),
}

/// A paginated producer of feed events.
///
/// `fetch_page` takes `&mut self` because real sources carry per-page cache
/// state that each response updates.
pub trait EventSource {
    fn fetch_page(
        &mut self,
        cursor: PageCursor,
    ) -> impl Future<Output = FetchOutcome> + Send;
}
