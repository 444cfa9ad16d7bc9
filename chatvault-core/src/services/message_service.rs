use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use chatvault_ai::sentiment::SentimentEngine;
use chatvault_common::models::{ChatMessage, NewMessage, Role};
use chatvault_common::traits::ChatMessageRepository;

use crate::cache::HistoryCache;
use crate::Error;

/// Longest accepted session key; matches the column width in Postgres.
const MAX_SESSION_ID_LEN: usize = 200;

/// The MessageService owns the cache-then-store read path and the
/// store-then-invalidate write path for chat history.
///
/// Ordering contract on writes: the durable mutation happens first, then the
/// cache entry is dropped. A concurrent reader sees either the pre-write
/// snapshot (stale, bounded by the TTL) or repopulates from the updated
/// store — never a partially updated snapshot.
pub struct MessageService<R: ChatMessageRepository> {
    repo: R,
    history_cache: HistoryCache,
    sentiment: Arc<SentimentEngine>,
}

impl<R: ChatMessageRepository> MessageService<R> {
    pub fn new(repo: R, history_cache: HistoryCache, sentiment: Arc<SentimentEngine>) -> Self {
        Self {
            repo,
            history_cache,
            sentiment,
        }
    }

    /// Full ordered history for a session: cached snapshot when present,
    /// otherwise a durable read that repopulates the cache.
    pub async fn get_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, Error> {
        validate_session_id(session_id)?;

        if let Some(cached) = self.history_cache.get(session_id).await {
            debug!("History cache hit for session '{}'", session_id);
            return Ok(cached);
        }

        let messages = self.repo.list_for_session(session_id).await?;
        self.history_cache.put(session_id, &messages).await;
        Ok(messages)
    }

    /// Append a message: classify sentiment for user messages, insert
    /// durably, then invalidate the session's cache entry.
    pub async fn send_message(&self, new: &NewMessage) -> Result<ChatMessage, Error> {
        validate_session_id(&new.session_id)?;
        if new.content.trim().is_empty() {
            return Err(Error::Validation("content must not be empty".into()));
        }
        let role = Role::from_str(&new.role).map_err(Error::Validation)?;

        // Assistant/system messages are stored untagged.
        let sentiment = match role {
            Role::User => Some(self.sentiment.analyze(&new.content).await),
            _ => None,
        };

        let msg = ChatMessage::new(&new.session_id, role, &new.content, sentiment);
        self.repo.insert_message(&msg).await?;
        self.history_cache.invalidate(&new.session_id).await;
        Ok(msg)
    }

    /// Remove every message in the session, then evict the cache entry.
    /// Returns the number of messages deleted.
    pub async fn clear_session(&self, session_id: &str) -> Result<u64, Error> {
        validate_session_id(session_id)?;
        let removed = self.repo.delete_session(session_id).await?;
        self.history_cache.invalidate(session_id).await;
        Ok(removed)
    }

    pub async fn count_messages(&self, session_id: &str) -> Result<i64, Error> {
        validate_session_id(session_id)?;
        self.repo.count_for_session(session_id).await
    }

    /// Health probe for the cache backend; false means degraded to
    /// durable-storage-only operation, not an outage.
    pub async fn cache_ping(&self) -> bool {
        self.history_cache.ping().await
    }
}

fn validate_session_id(session_id: &str) -> Result<(), Error> {
    if session_id.trim().is_empty() {
        return Err(Error::Validation("session_id must not be empty".into()));
    }
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(Error::Validation(format!(
            "session_id longer than {} characters",
            MAX_SESSION_ID_LEN
        )));
    }
    Ok(())
}
