// File: chatvault-common/src/traits/repository_traits.rs

use async_trait::async_trait;
use crate::error::Error;
use crate::models::ChatMessage;

/// Durable, ordered store of chat messages keyed by session.
///
/// Implementations must return `list_for_session` in conversational order
/// (created_at ascending, message_id as tiebreaker). Storage errors propagate
/// to the caller; this layer never degrades silently.
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    async fn insert_message(&self, msg: &ChatMessage) -> Result<(), Error>;

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<ChatMessage>, Error>;

    /// Delete every message in the session, returning how many rows went away.
    async fn delete_session(&self, session_id: &str) -> Result<u64, Error>;

    async fn count_for_session(&self, session_id: &str) -> Result<i64, Error>;
}
