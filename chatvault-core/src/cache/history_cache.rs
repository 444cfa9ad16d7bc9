// File: src/cache/history_cache.rs

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use chatvault_common::models::ChatMessage;

use super::backend::CacheBackend;

/// Fixed lifetime of a cached history snapshot.
pub const HISTORY_CACHE_TTL: Duration = Duration::from_secs(300);

/// Read-through, write-invalidate cache for per-session chat history.
///
/// Entries are full JSON snapshots of the ordered message list; they are
/// always replaced or deleted whole, never patched. The cache is strictly an
/// optimization: every backend failure is absorbed here and reported as a
/// miss (reads) or a no-op (writes), so callers stay correct on durable
/// storage alone.
pub struct HistoryCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl HistoryCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self::with_ttl(backend, HISTORY_CACHE_TTL)
    }

    /// Same cache with a custom TTL. Used by tests; production keeps the
    /// fixed 300 s snapshot lifetime.
    pub fn with_ttl(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    fn cache_key(session_id: &str) -> String {
        format!("chat_history:{}", session_id)
    }

    /// Cached snapshot if present and unexpired; `None` otherwise.
    /// Never raises: backend errors and undecodable entries count as a miss.
    pub async fn get(&self, session_id: &str) -> Option<Vec<ChatMessage>> {
        let key = Self::cache_key(session_id);
        match self.backend.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
                Ok(messages) => Some(messages),
                Err(e) => {
                    debug!("Discarding undecodable cache entry for {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("History cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Store a full snapshot with the configured TTL, overwriting any
    /// existing entry. Best-effort; failures are logged and swallowed.
    pub async fn put(&self, session_id: &str, messages: &[ChatMessage]) {
        let key = Self::cache_key(session_id);
        let raw = match serde_json::to_string(messages) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("History cache encode failed for {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.backend.set_with_expiry(&key, self.ttl, &raw).await {
            warn!("History cache write failed for {}: {}", key, e);
        }
    }

    /// Delete the cached entry unconditionally. Idempotent; failures are
    /// logged and swallowed.
    pub async fn invalidate(&self, session_id: &str) {
        let key = Self::cache_key(session_id);
        if let Err(e) = self.backend.delete(&key).await {
            warn!("History cache invalidate failed for {}: {}", key, e);
        }
    }

    pub async fn ping(&self) -> bool {
        self.backend.ping().await.is_ok()
    }
}
