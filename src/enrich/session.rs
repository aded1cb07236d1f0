//! Per-actor HTTP session cache.
//!
//! The identity endpoint correlates requests by cookie, so each actor gets
//! its own cookie-carrying client, built lazily on first sight and reused
//! for the rest of the run. The map is sharded so that concurrent dispatch
//! tasks contend on a sixteenth of the keyspace instead of one lock.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use tokio::sync::Mutex;

const SHARD_COUNT: usize = 16;
const SESSION_USER_AGENT: &str = "github-loadgen";

/// A sharded map from actor login to that actor's HTTP client.
pub struct SessionStore {
    shards: [Mutex<HashMap<String, reqwest::Client>>; SHARD_COUNT],
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| Mutex::new(HashMap::new())),
        }
    }

    fn shard_index(login: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        login.hash(&mut hasher);
        (hasher.finish() as usize) % SHARD_COUNT
    }

    /// The session client for `login`, creating it on first use.
    ///
    /// `reqwest::Client` is internally reference-counted, so the clone
    /// handed out shares the cached client's cookie jar.
    pub async fn client_for(&self, login: &str) -> Result<reqwest::Client, reqwest::Error> {
        let mut shard = self.shards[Self::shard_index(login)].lock().await;
        if let Some(client) = shard.get(login) {
            return Ok(client.clone());
        }
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(SESSION_USER_AGENT)
            .build()?;
        shard.insert(login.to_string(), client.clone());
        Ok(client)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        let mut total = 0;
        for shard in &self.shards {
            total += shard.lock().await.len();
        }
        total
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
