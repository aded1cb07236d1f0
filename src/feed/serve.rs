//! The polling loop.
//!
//! One cycle walks the pagination chain from page 1, accumulates events into
//! a batch, emits the batch on a bounded channel, and sleeps for whatever
//! delay the pacing policy settled on. Cancellation is only observed at the
//! sleep boundary, so an in-flight cycle always finishes and its batch is
//! emitted before shutdown; this keeps the no-partial-batch guarantee with
//! no extra bookkeeping.

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::FeedConfig;
use crate::github::SourceError;
use crate::types::{Batch, PageCursor};

use super::pacing::{PacingDecision, PacingPolicy};
use super::source::EventSource;

/// How the loop ended, when it ended gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// The cancellation token fired during a sleep.
    Cancelled,
    /// The batch receiver was dropped; nobody is listening any more.
    ConsumerGone,
}

/// Polls an `EventSource` forever and republishes batches.
pub struct EventFeed<S> {
    source: S,
    policy: PacingPolicy,
    config: FeedConfig,
    batches: mpsc::Sender<Batch>,
}

impl<S: EventSource> EventFeed<S> {
    /// Creates a feed and the receiving end of its batch channel.
    ///
    /// The channel is bounded at `config.queue_capacity`; when the consumer
    /// lags that far behind, the loop blocks on `send` instead of dropping
    /// or buffering batches.
    pub fn new(config: FeedConfig, source: S) -> (Self, mpsc::Receiver<Batch>) {
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let policy = PacingPolicy {
            default_delay: config.default_poll_delay,
            stop_on_cache_hit: config.stop_on_cache_hit,
        };
        (
            Self {
                source,
                policy,
                config,
                batches: tx,
            },
            rx,
        )
    }

    /// Runs polling cycles until cancellation, consumer loss, or a fatal
    /// source error.
    ///
    /// The batch channel closes on every exit path because `self` (and with
    /// it the sender) is consumed here, so the consumer always observes
    /// end-of-stream exactly once.
    pub async fn serve(mut self, shutdown: CancellationToken) -> Result<ServeOutcome, SourceError> {
        loop {
            let (batch, delay) = self.poll().await?;
            debug!(events = batch.len(), "cycle complete, emitting batch");
            if self.batches.send(batch).await.is_err() {
                info!("batch receiver dropped, stopping");
                return Ok(ServeOutcome::ConsumerGone);
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("shutdown requested, stopping");
                    return Ok(ServeOutcome::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {
                    debug!(slept_secs = delay.as_secs(), "resuming polling");
                }
            }
        }
    }

    /// One polling cycle: walk the chain, return the batch and the delay to
    /// sleep before the next cycle.
    #[instrument(skip(self), level = "debug")]
    async fn poll(&mut self) -> Result<(Batch, std::time::Duration), SourceError> {
        let mut batch = Batch::new();
        let mut delay = self.config.default_poll_delay;
        let mut cursor = PageCursor::FIRST;

        // The page ceiling bounds one cycle even if the server keeps
        // producing next links.
        for _ in 0..self.config.max_pages_per_cycle {
            debug!(%cursor, "fetching");
            let outcome = self.source.fetch_page(cursor).await;
            match self.policy.decide(outcome, Utc::now())? {
                PacingDecision::StopEarly { next_delay } => {
                    delay = next_delay;
                    break;
                }
                PacingDecision::Continue { page, next_delay } => {
                    delay = next_delay;
                    batch.extend(page.events);
                    match page.next {
                        Some(next) => cursor = next,
                        None => break,
                    }
                }
            }
        }

        Ok((batch, delay))
    }
}
