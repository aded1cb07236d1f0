//! The polling engine: source abstraction, pacing policy, and serve loop.

mod pacing;
mod serve;
mod source;

pub use pacing::{PacingDecision, PacingPolicy};
pub use serve::{EventFeed, ServeOutcome};
pub use source::{EventSource, FetchOutcome, FetchedPage, PageMetadata};
