//! Wire representation of events from GitHub's public feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ActorLogin, EventId};

/// The account that performed an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub login: ActorLogin,
}

/// A single event from the public feed.
///
/// Only the fields the feed consumers care about are typed; the event-kind
/// specific payload stays as raw JSON because its shape varies per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub kind: String,
    pub actor: Actor,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// All events observed during one polling cycle, in feed order.
///
/// A batch may be empty: a cycle that saw only cached or rate-limited pages
/// still produces one.
pub type Batch = Vec<FeedEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "44508520915",
        "type": "PushEvent",
        "actor": {
            "id": 583231,
            "login": "octocat",
            "url": "https://api.github.com/users/octocat"
        },
        "repo": {
            "id": 1296269,
            "name": "octocat/Hello-World"
        },
        "payload": {
            "push_id": 21457460023,
            "commits": [
                {
                    "sha": "7638417db6d59f3c431d3e1f261cc637155684cd",
                    "author": {"email": "octocat@github.com", "name": "The Octocat"}
                }
            ]
        },
        "public": true,
        "created_at": "2025-01-15T09:30:00Z"
    }"#;

    #[test]
    fn deserializes_real_feed_shape() {
        let event: FeedEvent = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(event.id, EventId::new("44508520915"));
        assert_eq!(event.kind, "PushEvent");
        assert_eq!(event.actor.login, ActorLogin::new("octocat"));
        assert_eq!(
            event.created_at,
            "2025-01-15T09:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert!(event.payload.get("commits").is_some());
    }

    #[test]
    fn missing_payload_defaults_to_null() {
        let event: FeedEvent = serde_json::from_str(
            r#"{
                "id": "1",
                "type": "WatchEvent",
                "actor": {"login": "octocat"},
                "created_at": "2025-01-15T09:30:00Z"
            }"#,
        )
        .unwrap();
        assert!(event.payload.is_null());
    }
}
