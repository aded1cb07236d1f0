//! Error types for the events endpoint.
//!
//! Rate-limit exhaustion is deliberately NOT an error: the server telling us
//! to slow down is a pacing signal, handled by the polling policy. Everything
//! here is fatal to the polling loop.

use thiserror::Error;

/// A fatal failure while fetching or decoding a feed page.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never produced a usable response (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status that is not a
    /// rate-limit signal.
    #[error("GitHub API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected events JSON.
    #[error("malformed feed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured auth token contains bytes that cannot appear in an
    /// HTTP header. The token itself is never included in the error.
    #[error("auth token is not a valid header value")]
    InvalidToken,
}
