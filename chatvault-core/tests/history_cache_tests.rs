// File: chatvault-core/tests/history_cache_tests.rs

use std::sync::Arc;
use std::time::Duration;

use chatvault_common::models::{ChatMessage, Role};
use chatvault_core::cache::{HistoryCache, HISTORY_CACHE_TTL};
use chatvault_core::test_utils::MemoryCacheBackend;

fn msg(session_id: &str, role: Role, content: &str) -> ChatMessage {
    ChatMessage::new(session_id, role, content, None)
}

#[tokio::test]
async fn get_on_empty_cache_is_a_miss() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::new(backend);

    assert!(cache.get("s1").await.is_none());
}

#[tokio::test]
async fn put_then_get_round_trips_the_snapshot() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::new(backend);

    let messages = vec![
        msg("s1", Role::User, "hello"),
        msg("s1", Role::Assistant, "hi there"),
    ];
    cache.put("s1", &messages).await;

    let cached = cache.get("s1").await.expect("snapshot should be cached");
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].content, "hello");
    assert_eq!(cached[0].role, Role::User);
    assert_eq!(cached[1].content, "hi there");
    assert_eq!(cached[1].message_id, messages[1].message_id);
}

#[tokio::test]
async fn put_overwrites_the_whole_entry() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::new(backend);

    cache.put("s1", &[msg("s1", Role::User, "old")]).await;
    let replacement = vec![
        msg("s1", Role::User, "new one"),
        msg("s1", Role::Assistant, "new two"),
    ];
    cache.put("s1", &replacement).await;

    let cached = cache.get("s1").await.unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].content, "new one");
}

#[tokio::test]
async fn entries_expire_at_exactly_the_ttl() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::new(backend.clone());

    cache.put("s1", &[msg("s1", Role::User, "hello")]).await;

    // One tick before the TTL the snapshot is still served.
    backend.advance(HISTORY_CACHE_TTL - Duration::from_secs(1));
    assert!(cache.get("s1").await.is_some());

    // At the TTL boundary it is gone.
    backend.advance(Duration::from_secs(1));
    assert!(cache.get("s1").await.is_none());
}

#[tokio::test]
async fn custom_ttl_is_honored() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::with_ttl(backend.clone(), Duration::from_secs(5));

    cache.put("s1", &[msg("s1", Role::User, "hello")]).await;
    backend.advance(Duration::from_secs(5));
    assert!(cache.get("s1").await.is_none());
}

#[tokio::test]
async fn invalidate_removes_the_entry_and_is_idempotent() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::new(backend.clone());

    cache.put("s1", &[msg("s1", Role::User, "hello")]).await;
    assert!(backend.contains_key("chat_history:s1"));

    cache.invalidate("s1").await;
    assert!(!backend.contains_key("chat_history:s1"));
    assert!(cache.get("s1").await.is_none());

    // Second invalidate of an absent entry is a no-op, not an error.
    cache.invalidate("s1").await;
}

#[tokio::test]
async fn sessions_do_not_share_entries() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::new(backend);

    cache.put("s1", &[msg("s1", Role::User, "for s1")]).await;

    assert!(cache.get("s2").await.is_none());
    assert_eq!(cache.get("s1").await.unwrap()[0].content, "for s1");
}

#[tokio::test]
async fn unreachable_backend_degrades_to_misses_without_panicking() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::new(backend.clone());

    cache.put("s1", &[msg("s1", Role::User, "hello")]).await;
    backend.set_unreachable(true);

    // Reads degrade to a miss, writes to a no-op; nothing raises.
    assert!(cache.get("s1").await.is_none());
    cache.put("s1", &[msg("s1", Role::User, "other")]).await;
    cache.invalidate("s1").await;
    assert!(!cache.ping().await);

    // Once the backend is back the old entry is still served.
    backend.set_unreachable(false);
    assert!(cache.ping().await);
    assert_eq!(cache.get("s1").await.unwrap()[0].content, "hello");
}

#[tokio::test]
async fn undecodable_entry_counts_as_a_miss() {
    use chatvault_core::cache::backend::CacheBackend;

    let backend = Arc::new(MemoryCacheBackend::new());
    backend
        .set_with_expiry("chat_history:s1", Duration::from_secs(60), "not json")
        .await
        .unwrap();

    let cache = HistoryCache::new(backend);
    assert!(cache.get("s1").await.is_none());
}

#[tokio::test]
async fn empty_snapshot_is_cacheable() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = HistoryCache::new(backend);

    cache.put("s1", &[]).await;
    let cached = cache.get("s1").await.expect("empty snapshot is a valid entry");
    assert!(cached.is_empty());
}
