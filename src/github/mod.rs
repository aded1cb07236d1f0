//! GitHub events API client.
//!
//! This module implements the live `EventSource`: a reqwest-based client for
//! the public events endpoint that understands GitHub's pacing protocol
//! (poll-interval hints, rate-limit headers, conditional requests, and
//! `Link`-header pagination).

mod client;
mod error;
mod headers;

pub use client::GithubEvents;
pub use error::SourceError;
