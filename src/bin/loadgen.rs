//! Load generator binary: polls the public feed and replays each batch
//! against an identity endpoint, one paced report per event.

use anyhow::Context;
use github_feed::config::FeedConfig;
use github_feed::enrich::{DispatchConfig, Dispatcher};
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
    let dispatch = DispatchConfig::from_env().context("IDENTIFY_ENDPOINT is not set")?;
    info!(?config, endpoint = %dispatch.endpoint, "starting load generator");

    let source = GithubEvents::new(&config).context("building GitHub client")?;
    let (feed, mut batches) = EventFeed::new(config, source);
    let dispatcher = Dispatcher::new(dispatch);

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

    // Each batch gets its own dispatch task: a batch is spread across a full
    // window, and the next one usually arrives before the window closes.
    while let Some(batch) = batches.recv().await {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.dispatch_batch(batch).await });
    }

    let outcome = server
        .await
        .context("feed task panicked")?
        .context("feed stopped on a fatal error")?;
    info!(?outcome, "load generator stopped");
    Ok(())
}
