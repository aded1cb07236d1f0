//! Parsing of the pacing and pagination headers on events responses.
//!
//! GitHub communicates polling cadence entirely through response headers:
//! `X-Poll-Interval` carries the minimum seconds between polls,
//! `X-RateLimit-Remaining`/`X-RateLimit-Reset` describe quota, and the
//! `Link` header carries the pagination chain. All parsers here are lenient:
//! a missing or malformed header yields `None` and the caller falls back to
//! its default.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, LINK};
use std::time::Duration;

use crate::types::PageCursor;

const POLL_INTERVAL: &str = "x-poll-interval";
const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATELIMIT_RESET: &str = "x-ratelimit-reset";

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// The server's requested minimum delay before the next poll, if present.
pub fn poll_hint(headers: &HeaderMap) -> Option<Duration> {
    header_number(headers, POLL_INTERVAL).map(Duration::from_secs)
}

/// How many requests remain in the current rate-limit window, if present.
pub fn ratelimit_remaining(headers: &HeaderMap) -> Option<u32> {
    header_number(headers, RATELIMIT_REMAINING).map(|n| n as u32)
}

/// When the current rate-limit window resets, if present.
///
/// The header carries a unix timestamp in whole seconds.
pub fn ratelimit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let secs = header_number(headers, RATELIMIT_RESET)?;
    Utc.timestamp_opt(secs as i64, 0).single()
}

/// The page number of the `rel="next"` link, if the response has one.
///
/// The last page of a chain carries no next link, which is how pagination
/// terminates naturally.
pub fn next_page(headers: &HeaderMap) -> Option<PageCursor> {
    let link = headers.get(LINK)?.to_str().ok()?;
    for part in link.split(',') {
        let mut segments = part.split(';');
        let url = segments.next()?.trim();
        let is_next = segments
            .any(|attr| attr.trim() == "rel=\"next\"" || attr.trim() == "rel=next");
        if !is_next {
            continue;
        }
        let url = url.strip_prefix('<')?.strip_suffix('>')?;
        let query = url.split_once('?')?.1;
        for pair in query.split('&') {
            if let Some(value) = pair.strip_prefix("page=") {
                return value.parse().ok().map(PageCursor);
            }
        }
    }
    None
}
