//! Feed configuration, read from the environment.

use std::env;
use std::fmt;
use std::time::Duration;

/// Pages fetched per cycle at most. GitHub only serves this many pages of
/// the public events endpoint regardless of pagination links.
pub const MAX_EVENT_PAGES: u32 = 10;

/// Events per page. GitHub's documented maximum for this endpoint.
pub const MAX_EVENTS_PER_PAGE: u32 = 30;

/// Fallback delay between cycles when the server sends no hint.
pub const DEFAULT_POLL_SECS: u64 = 60;

/// Default bound on the batch channel.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Settings for the polling loop and its GitHub client.
#[derive(Clone)]
pub struct FeedConfig {
    /// GitHub API token. Empty means unauthenticated polling.
    pub auth_token: String,
    /// Capacity of the batch channel; the loop blocks when it is full.
    pub queue_capacity: usize,
    /// Ceiling on pages walked in one cycle.
    pub max_pages_per_cycle: u32,
    /// Events requested per page.
    pub max_events_per_page: u32,
    /// Delay between cycles absent a server hint.
    pub default_poll_delay: Duration,
    /// Whether a cache hit ends the cycle early.
    pub stop_on_cache_hit: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_pages_per_cycle: MAX_EVENT_PAGES,
            max_events_per_page: MAX_EVENTS_PER_PAGE,
            default_poll_delay: Duration::from_secs(DEFAULT_POLL_SECS),
            stop_on_cache_hit: true,
        }
    }
}

impl FeedConfig {
    /// Loads configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GITHUB_AUTH_TOKEN`: API token (default: empty, unauthenticated)
    /// - `GITHUB_FEED_QUEUE_CAPACITY`: batch channel bound (default: 16)
    /// - `GITHUB_FEED_MAX_PAGES`: per-cycle page ceiling (default: 10)
    /// - `GITHUB_FEED_PER_PAGE`: events per page (default: 30)
    /// - `GITHUB_FEED_POLL_SECS`: fallback poll delay (default: 60)
    /// - `GITHUB_FEED_STOP_ON_CACHE_HIT`: end cycles on 304 (default: true)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_token: env::var("GITHUB_AUTH_TOKEN").unwrap_or_default(),
            queue_capacity: env::var("GITHUB_FEED_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.queue_capacity),
            max_pages_per_cycle: env::var("GITHUB_FEED_MAX_PAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_pages_per_cycle),
            max_events_per_page: env::var("GITHUB_FEED_PER_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_events_per_page),
            default_poll_delay: env::var("GITHUB_FEED_POLL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.default_poll_delay),
            stop_on_cache_hit: env::var("GITHUB_FEED_STOP_ON_CACHE_HIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.stop_on_cache_hit),
        }
    }
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field(
                "auth_token",
                &if self.auth_token.is_empty() {
                    "<unset>"
                } else {
                    "<redacted>"
                },
            )
            .field("queue_capacity", &self.queue_capacity)
            .field("max_pages_per_cycle", &self.max_pages_per_cycle)
            .field("max_events_per_page", &self.max_events_per_page)
            .field("default_poll_delay", &self.default_poll_delay)
            .field("stop_on_cache_hit", &self.stop_on_cache_hit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_endpoint_limits() {
        let config = FeedConfig::default();
        assert_eq!(config.max_pages_per_cycle, 10);
        assert_eq!(config.max_events_per_page, 30);
        assert_eq!(config.default_poll_delay, Duration::from_secs(60));
        assert_eq!(config.queue_capacity, 16);
        assert!(config.stop_on_cache_hit);
    }

    #[test]
    fn from_env_parses_and_falls_back_per_variable() {
        env::set_var("GITHUB_FEED_QUEUE_CAPACITY", "64");
        env::set_var("GITHUB_FEED_MAX_PAGES", "not-a-number");
        env::set_var("GITHUB_FEED_POLL_SECS", "120");

        let config = FeedConfig::from_env();
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.max_pages_per_cycle, MAX_EVENT_PAGES);
        assert_eq!(config.default_poll_delay, Duration::from_secs(120));

        env::remove_var("GITHUB_FEED_QUEUE_CAPACITY");
        env::remove_var("GITHUB_FEED_MAX_PAGES");
        env::remove_var("GITHUB_FEED_POLL_SECS");
    }

    #[test]
    fn debug_output_never_contains_the_token() {
        let config = FeedConfig {
            auth_token: "ghp_secret123".to_string(),
            ..FeedConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("ghp_secret123"));
        assert!(rendered.contains("<redacted>"));
    }
}
