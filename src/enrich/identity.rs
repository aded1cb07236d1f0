//! Identity extraction from feed events.
//!
//! Each event yields a set of opaque identifiers for the downstream identity
//! endpoint: one for the acting account, plus one per distinct public commit
//! author email on push events. Emails never leave this module in the clear;
//! they are hashed before an identifier is formed.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::types::FeedEvent;

const PUSH_EVENT: &str = "PushEvent";

/// Identifier for the account that performed an event.
fn actor_identifier(login: &str) -> String {
    format!("c:{}", login.to_lowercase())
}

/// Identifier for a commit author email, keyed by its SHA-256 digest.
fn email_identifier(email: &str) -> String {
    format!("e:{}", hex::encode(Sha256::digest(email.as_bytes())))
}

/// Whether an email is worth reporting at all.
///
/// GitHub's noreply addresses and git's `.local` placeholder hostnames say
/// nothing about a real identity.
fn is_public_email(email: &str) -> bool {
    !email.is_empty()
        && !email.ends_with("noreply.github.com")
        && !email.ends_with(".local")
}

/// All identifiers derivable from one event, deduplicated, actor first.
pub fn gather_identifiers(event: &FeedEvent) -> Vec<String> {
    let mut identifiers = vec![actor_identifier(event.actor.login.as_str())];

    if event.kind == PUSH_EVENT {
        let mut seen = HashSet::new();
        let commits = event
            .payload
            .get("commits")
            .and_then(|c| c.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for commit in commits {
            let Some(email) = commit.pointer("/author/email").and_then(|e| e.as_str()) else {
                continue;
            };
            let email = email.to_lowercase();
            if is_public_email(&email) && seen.insert(email.clone()) {
                identifiers.push(email_identifier(&email));
            }
        }
    }

    identifiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Actor, ActorLogin, EventId};
    use chrono::Utc;
    use serde_json::json;

    fn push_event(commits: serde_json::Value) -> FeedEvent {
        FeedEvent {
            id: EventId::new("1"),
            kind: "PushEvent".to_string(),
            actor: Actor {
                login: ActorLogin::new("Octocat"),
            },
            payload: json!({ "commits": commits }),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn actor_identifier_is_lowercased_login() {
        let event = push_event(json!([]));
        assert_eq!(gather_identifiers(&event), vec!["c:octocat"]);
    }

    #[test]
    fn push_commits_yield_hashed_email_identifiers() {
        let event = push_event(json!([
            { "author": { "email": "alice@example.com" } }
        ]));
        let identifiers = gather_identifiers(&event);
        assert_eq!(identifiers.len(), 2);
        assert_eq!(identifiers[0], "c:octocat");
        let hash = identifiers[1].strip_prefix("e:").unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        // The raw email must not appear anywhere.
        assert!(!identifiers[1].contains("alice"));
    }

    #[test]
    fn same_email_hashes_identically_across_case() {
        let a = push_event(json!([{ "author": { "email": "Alice@Example.com" } }]));
        let b = push_event(json!([{ "author": { "email": "alice@example.com" } }]));
        assert_eq!(gather_identifiers(&a), gather_identifiers(&b));
    }

    #[test]
    fn duplicate_emails_are_reported_once() {
        let event = push_event(json!([
            { "author": { "email": "alice@example.com" } },
            { "author": { "email": "ALICE@example.com" } },
            { "author": { "email": "bob@example.com" } }
        ]));
        assert_eq!(gather_identifiers(&event).len(), 3);
    }

    #[test]
    fn private_emails_are_skipped() {
        let event = push_event(json!([
            { "author": { "email": "12345+octocat@users.noreply.github.com" } },
            { "author": { "email": "dev@machine.local" } },
            { "author": { "email": "" } }
        ]));
        assert_eq!(gather_identifiers(&event), vec!["c:octocat"]);
    }

    #[test]
    fn commits_without_author_email_are_skipped() {
        let event = push_event(json!([
            { "sha": "abc" },
            { "author": { "name": "anon" } }
        ]));
        assert_eq!(gather_identifiers(&event), vec!["c:octocat"]);
    }

    #[test]
    fn non_push_events_yield_only_the_actor() {
        let event = FeedEvent {
            id: EventId::new("2"),
            kind: "WatchEvent".to_string(),
            actor: Actor {
                login: ActorLogin::new("octocat"),
            },
            payload: json!({ "commits": [{ "author": { "email": "x@example.com" } }] }),
            created_at: Utc::now(),
        };
        assert_eq!(gather_identifiers(&event), vec!["c:octocat"]);
    }
}
