//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different identifier kinds (e.g.,
//! using an event ID where a page cursor is expected) and make the code more
//! self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A GitHub event identifier, unique per event in the public feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(s: impl Into<String>) -> Self {
        EventId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        EventId(s)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        EventId(s.to_string())
    }
}

/// A GitHub account login as it appears in the event feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorLogin(pub String);

impl ActorLogin {
    pub fn new(s: impl Into<String>) -> Self {
        ActorLogin(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this login looks like an automation account.
    ///
    /// GitHub renders app accounts as `name[bot]`, but the feed sometimes
    /// carries the suffix without brackets, with only one bracket, or in
    /// mixed case. All of those count as bots here.
    pub fn is_bot(&self) -> bool {
        let lowered = self.0.to_ascii_lowercase();
        let trimmed = lowered.strip_suffix(']').unwrap_or(&lowered);
        trimmed.ends_with("bot")
    }
}

impl fmt::Display for ActorLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ActorLogin {
    fn from(s: String) -> Self {
        ActorLogin(s)
    }
}

impl From<&str> for ActorLogin {
    fn from(s: &str) -> Self {
        ActorLogin(s.to_string())
    }
}

/// A 1-based page number within one pagination chain of the events endpoint.
///
/// Cursors are only meaningful within the polling cycle that produced them;
/// the feed shifts underneath the pagination, so a cursor must never be
/// carried across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(pub u32);

impl PageCursor {
    /// The first page of a pagination chain. Every cycle starts here.
    pub const FIRST: PageCursor = PageCursor(1);
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}", self.0)
    }
}

impl From<u32> for PageCursor {
    fn from(n: u32) -> Self {
        PageCursor(n)
    }
}
