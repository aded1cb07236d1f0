//! Core domain types for the event feed.
//!
//! This module contains the fundamental types used throughout the crate,
//! designed to encode invariants via the type system.

pub mod event;
pub mod ids;

// Re-export commonly used types at the module level
pub use event::{Actor, Batch, FeedEvent};
pub use ids::{ActorLogin, EventId, PageCursor};
