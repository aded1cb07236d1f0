//! Republisher binary: polls the public feed and writes batches to stdout,
//! one event per line as JSON. Bot accounts are filtered out.

use std::io::Write;

use anyhow::Context;
use github_feed::config::FeedConfig;
use github_feed::feed::EventFeed;
use github_feed::github::GithubEvents;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "github_feed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FeedConfig::from_env();
    info!(?config, "starting feed");

    let source = GithubEvents::new(&config).context("building GitHub client")?;
    let (feed, mut batches) = EventFeed::new(config, source);

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "could not listen for ctrl-c");
                return;
            }
            shutdown.cancel();
        }
    });

    let server = tokio::spawn(feed.serve(shutdown));

    let stdout = std::io::stdout();
    while let Some(batch) = batches.recv().await {
        let mut out = stdout.lock();
        for event in &batch {
            if event.actor.login.is_bot() {
                continue;
            }
            serde_json::to_writer(&mut out, event).context("writing event")?;
            out.write_all(b"\n").context("writing event")?;
        }
    }

    let outcome = server
        .await
        .context("feed task panicked")?
        .context("feed stopped on a fatal error")?;
    info!(?outcome, "feed stopped");
    Ok(())
}
