// File: chatvault-core/src/test_utils/mod.rs
//
// In-memory doubles for the repository and cache-backend seams. Used by the
// integration tests in `tests/`; no live Postgres or Redis required.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use chatvault_common::models::ChatMessage;
use chatvault_common::traits::ChatMessageRepository;
use chatvault_common::Error;

use crate::cache::backend::{CacheBackend, CacheError};

/// HashMap-backed `ChatMessageRepository` that counts durable reads, so
/// tests can assert a cache hit short-circuited the store. Clones share
/// state, like the Postgres repository shares its pool.
#[derive(Default, Clone)]
pub struct MemoryChatMessageRepository {
    inner: Arc<RepoInner>,
}

#[derive(Default)]
struct RepoInner {
    messages: Mutex<Vec<ChatMessage>>,
    list_calls: AtomicUsize,
}

impl MemoryChatMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `list_for_session` hit this store.
    pub fn list_calls(&self) -> usize {
        self.inner.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatMessageRepository for MemoryChatMessageRepository {
    async fn insert_message(&self, msg: &ChatMessage) -> Result<(), Error> {
        self.inner.messages.lock().unwrap().push(msg.clone());
        Ok(())
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<ChatMessage>, Error> {
        self.inner.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut out: Vec<ChatMessage> = self
            .inner
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.message_id.cmp(&b.message_id))
        });
        Ok(out)
    }

    async fn delete_session(&self, session_id: &str) -> Result<u64, Error> {
        let mut guard = self.inner.messages.lock().unwrap();
        let before = guard.len();
        guard.retain(|m| m.session_id != session_id);
        Ok((before - guard.len()) as u64)
    }

    async fn count_for_session(&self, session_id: &str) -> Result<i64, Error> {
        let count = self
            .inner
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .count();
        Ok(count as i64)
    }
}

/// In-memory `CacheBackend` with a manual clock for TTL tests and a flip
/// switch that makes every operation fail like an unreachable backend.
#[derive(Default)]
pub struct MemoryCacheBackend {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    clock: Mutex<Duration>,
    unreachable: AtomicBool,
}

impl MemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the logical clock; entries whose expiry is reached become
    /// absent on the next read.
    pub fn advance(&self, by: Duration) {
        let mut clock = self.clock.lock().unwrap();
        *clock += by;
    }

    /// Simulate the backend going away (or coming back).
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    fn check_reachable(&self) -> Result<(), CacheError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(CacheError::Unavailable("simulated outage".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_reachable()?;
        let now = *self.clock.lock().unwrap();
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((_, expires_at)) if now >= *expires_at => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: &str) -> Result<(), CacheError> {
        self.check_reachable()?;
        let now = *self.clock.lock().unwrap();
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.check_reachable()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.check_reachable()
    }
}
