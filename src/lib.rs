//! GitHub public event feed poller.
//!
//! This library polls GitHub's paginated public events endpoint and
//! republishes newly observed events as ordered batches on a bounded channel.
//! The server is authoritative about pacing: poll-interval hints and
//! rate-limit reset timestamps from the API drive the delay between cycles.

pub mod config;
pub mod enrich;
pub mod feed;
pub mod github;
pub mod types;
