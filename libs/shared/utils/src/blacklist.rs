use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

/// Revoked tokens, each kept only until its own expiry.
#[derive(Default)]
pub struct TokenBlacklist {
    entries: RwLock<HashMap<String, i64>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revokes `token` until the unix timestamp `expires_at`.
    pub async fn revoke(&self, token: &str, expires_at: i64) {
        self.entries.write().await.insert(token.to_string(), expires_at);
    }

    pub async fn is_revoked(&self, token: &str) -> bool {
        let now = Utc::now().timestamp();

        let expires_at = match self.entries.read().await.get(token) {
            Some(expires_at) => *expires_at,
            None => return false,
        };

        if expires_at > now {
            return true;
        }

        // Past expiry the token is rejected by validation anyway.
        self.entries.write().await.remove(token);
        false
    }

    /// Drops expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        let removed = before - entries.len();
        if removed > 0 {
            debug!("Purged {} expired blacklist entries", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
