//! The pacing policy: how one fetch outcome steers the polling loop.
//!
//! The server is authoritative. A poll-interval hint, a rate-limit reset
//! timestamp, or a cache hit each override whatever the loop would otherwise
//! do. The rules are ordered; the first that applies wins.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::github::SourceError;

use super::source::{FetchOutcome, FetchedPage};

/// What the loop should do after one fetch.
#[derive(Debug)]
pub enum PacingDecision {
    /// Keep the page's events and, if it links onward, keep paginating.
    Continue {
        page: FetchedPage,
        next_delay: Duration,
    },
    /// Stop paginating now and sleep. The current batch is emitted as-is.
    StopEarly { next_delay: Duration },
}

/// Decides pacing from fetch outcomes. Pure apart from logging.
#[derive(Debug, Clone)]
pub struct PacingPolicy {
    /// Used whenever the server sends no poll-interval hint.
    pub default_delay: Duration,
    /// Whether a cache hit ends the cycle before its page is consumed.
    pub stop_on_cache_hit: bool,
}

impl PacingPolicy {
    /// Applies the pacing rules to one fetch outcome.
    ///
    /// Rules, in order:
    /// 1. Rate-limited: stop early, sleep until the reset timestamp.
    /// 2. Fatal error: propagate. The loop does not retry these.
    /// 3. Cache hit (when configured to stop): stop early, discarding the
    ///    cached page's contents.
    /// 4. Otherwise continue with the page; the hint (or the default) sets
    ///    the delay.
    pub fn decide(
        &self,
        outcome: FetchOutcome,
        now: DateTime<Utc>,
    ) -> Result<PacingDecision, SourceError> {
        match outcome {
            FetchOutcome::RateLimited { reset } => {
                let next_delay = (reset - now).to_std().unwrap_or(Duration::ZERO);
                warn!(
                    reset = %reset,
                    wait_secs = next_delay.as_secs(),
                    "rate limit exhausted, pausing until reset"
                );
                Ok(PacingDecision::StopEarly { next_delay })
            }
            FetchOutcome::Failed(err) => Err(err),
            FetchOutcome::Page(page) if page.metadata.cache_hit && self.stop_on_cache_hit => {
                debug!("cache hit, ending cycle early");
                Ok(PacingDecision::StopEarly {
                    next_delay: self.delay_from(&page),
                })
            }
            FetchOutcome::Page(page) => {
                let next_delay = self.delay_from(&page);
                Ok(PacingDecision::Continue { page, next_delay })
            }
        }
    }

    fn delay_from(&self, page: &FetchedPage) -> Duration {
        page.metadata.poll_hint.unwrap_or(self.default_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::source::PageMetadata;
    use chrono::TimeZone;
    use proptest::prelude::*;

    const DEFAULT: Duration = Duration::from_secs(60);

    fn policy() -> PacingPolicy {
        PacingPolicy {
            default_delay: DEFAULT,
            stop_on_cache_hit: true,
        }
    }

    fn page(poll_hint: Option<Duration>, cache_hit: bool) -> FetchedPage {
        FetchedPage {
            events: Vec::new(),
            next: None,
            metadata: PageMetadata {
                poll_hint,
                cache_hit,
                ..PageMetadata::default()
            },
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn rate_limit_stops_early_and_waits_until_reset() {
        let reset = now() + chrono::Duration::seconds(90);
        let decision = policy()
            .decide(FetchOutcome::RateLimited { reset }, now())
            .unwrap();
        match decision {
            PacingDecision::StopEarly { next_delay } => {
                assert_eq!(next_delay, Duration::from_secs(90));
            }
            other => panic!("expected StopEarly, got {:?}", other),
        }
    }

    #[test]
    fn past_reset_clamps_to_zero() {
        let reset = now() - chrono::Duration::seconds(30);
        let decision = policy()
            .decide(FetchOutcome::RateLimited { reset }, now())
            .unwrap();
        match decision {
            PacingDecision::StopEarly { next_delay } => {
                assert_eq!(next_delay, Duration::ZERO);
            }
            other => panic!("expected StopEarly, got {:?}", other),
        }
    }

    #[test]
    fn fatal_error_propagates() {
        let outcome = FetchOutcome::Failed(SourceError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(policy().decide(outcome, now()).is_err());
    }

    #[test]
    fn cache_hit_stops_early_by_default() {
        let decision = policy()
            .decide(FetchOutcome::Page(page(None, true)), now())
            .unwrap();
        assert!(matches!(decision, PacingDecision::StopEarly { .. }));
    }

    #[test]
    fn cache_hit_continues_when_configured() {
        let mut p = policy();
        p.stop_on_cache_hit = false;
        let decision = p
            .decide(FetchOutcome::Page(page(None, true)), now())
            .unwrap();
        assert!(matches!(decision, PacingDecision::Continue { .. }));
    }

    #[test]
    fn fresh_page_continues_with_hint_delay() {
        let decision = policy()
            .decide(
                FetchOutcome::Page(page(Some(Duration::from_secs(45)), false)),
                now(),
            )
            .unwrap();
        match decision {
            PacingDecision::Continue { next_delay, .. } => {
                assert_eq!(next_delay, Duration::from_secs(45));
            }
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    #[test]
    fn missing_hint_falls_back_to_default() {
        let decision = policy()
            .decide(FetchOutcome::Page(page(None, false)), now())
            .unwrap();
        match decision {
            PacingDecision::Continue { next_delay, .. } => {
                assert_eq!(next_delay, DEFAULT);
            }
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn hint_always_wins_over_default(secs in 1u64..3600) {
            let hint = Duration::from_secs(secs);
            let decision = policy()
                .decide(FetchOutcome::Page(page(Some(hint), false)), now())
                .unwrap();
            match decision {
                PacingDecision::Continue { next_delay, .. } => {
                    prop_assert_eq!(next_delay, hint);
                }
                other => panic!("expected Continue, got {:?}", other),
            }
        }

        #[test]
        fn reset_delay_never_negative(offset in -600i64..600) {
            let reset = now() + chrono::Duration::seconds(offset);
            let decision = policy()
                .decide(FetchOutcome::RateLimited { reset }, now())
                .unwrap();
            match decision {
                PacingDecision::StopEarly { next_delay } => {
                    let expected = Duration::from_secs(offset.max(0) as u64);
                    prop_assert_eq!(next_delay, expected);
                }
                other => panic!("expected StopEarly, got {:?}", other),
            }
        }
    }
}
