//! Paced delivery of identity reports to the downstream endpoint.
//!
//! A batch's events are spread evenly across a dispatch window rather than
//! fired at once, and the number of in-flight requests is capped by a
//! semaphore so a slow endpoint cannot pile up unbounded tasks.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{info, trace, warn};

use crate::types::{Batch, FeedEvent};

use super::identity::gather_identifiers;
use super::session::SessionStore;

const DEFAULT_WINDOW: Duration = Duration::from_secs(60);
const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Settings for the identity dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Where identity reports are POSTed.
    pub endpoint: String,
    /// The span of time one batch is spread across.
    pub window: Duration,
    /// Cap on concurrent in-flight reports.
    pub max_in_flight: usize,
}

impl DispatchConfig {
    /// Reads dispatcher settings from the environment.
    ///
    /// Returns `None` when `IDENTIFY_ENDPOINT` is unset; there is no
    /// sensible default destination for identity reports.
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("IDENTIFY_ENDPOINT").ok()?;
        let window = env::var("IDENTIFY_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_WINDOW);
        let max_in_flight = env::var("IDENTIFY_MAX_IN_FLIGHT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_IN_FLIGHT);
        Some(Self {
            endpoint,
            window,
            max_in_flight,
        })
    }
}

/// The interval between consecutive sends when `count` events share a window.
fn dispatch_tick(window: Duration, count: usize) -> Duration {
    let count = count.max(1) as u32;
    (window / count).max(Duration::from_millis(1))
}

/// Sends identity reports for feed events, one session per actor.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<DispatchConfig>,
    sessions: Arc<SessionStore>,
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_in_flight));
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
            permits,
        }
    }

    /// Spreads one batch's reports evenly across the dispatch window.
    ///
    /// Bot accounts are skipped. Individual send failures are logged and
    /// dropped; a report that misses is not worth stalling the feed for.
    pub async fn dispatch_batch(&self, batch: Batch) {
        if batch.is_empty() {
            return;
        }
        let tick = dispatch_tick(self.config.window, batch.len());
        info!(
            events = batch.len(),
            tick_ms = tick.as_millis() as u64,
            "dispatching batch"
        );

        // interval_at so the first send waits a full tick, keeping
        // back-to-back batches from bursting at the window boundary.
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
        for event in batch {
            ticker.tick().await;
            if event.actor.login.is_bot() {
                trace!(actor = %event.actor.login, "skipping bot account");
                continue;
            }
            let permit = match self.permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore only closes if someone closes it explicitly,
                // which nothing does; treat it as shutdown anyway.
                Err(_) => return,
            };
            let dispatcher = self.clone();
            tokio::spawn(async move {
                dispatcher.send_report(&event).await;
                drop(permit);
            });
        }
    }

    async fn send_report(&self, event: &FeedEvent) {
        let login = event.actor.login.as_str();
        let identifiers = gather_identifiers(event);

        let client = match self.sessions.client_for(login).await {
            Ok(client) => client,
            Err(err) => {
                warn!(actor = login, error = %err, "could not build session client");
                return;
            }
        };

        let response = client
            .post(&self.config.endpoint)
            .json(&identifiers)
            .send()
            .await;
        match response {
            Ok(response) if response.status().is_success() => {
                trace!(actor = login, ids = identifiers.len(), "report delivered");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!(actor = login, %status, body, "identity endpoint rejected report");
            }
            Err(err) => {
                warn!(actor = login, error = %err, "identity report failed");
            }
        }
    }
}
