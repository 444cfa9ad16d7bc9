// File: chatvault-core/tests/message_service_tests.rs

use std::sync::Arc;
use std::time::Duration;

use chatvault_ai::sentiment::SentimentEngine;
use chatvault_common::models::NewMessage;
use chatvault_common::Error;
use chatvault_core::cache::HistoryCache;
use chatvault_core::services::MessageService;
use chatvault_core::test_utils::{MemoryCacheBackend, MemoryChatMessageRepository};

fn new_message(session_id: &str, role: &str, content: &str) -> NewMessage {
    NewMessage {
        session_id: session_id.to_string(),
        role: role.to_string(),
        content: content.to_string(),
    }
}

struct Harness {
    backend: Arc<MemoryCacheBackend>,
    repo: MemoryChatMessageRepository,
    service: MessageService<MemoryChatMessageRepository>,
}

fn build_service() -> Harness {
    let backend = Arc::new(MemoryCacheBackend::new());
    let repo = MemoryChatMessageRepository::new();
    let cache = HistoryCache::new(backend.clone());
    let service = MessageService::new(
        repo.clone(),
        cache,
        Arc::new(SentimentEngine::lexicon_only()),
    );
    Harness {
        backend,
        repo,
        service,
    }
}

#[tokio::test]
async fn first_read_populates_cache_second_read_skips_the_store() -> Result<(), Error> {
    let h = build_service();

    h.service
        .send_message(&new_message("s1", "user", "hello there"))
        .await?;
    h.service
        .send_message(&new_message("s1", "assistant", "hi!"))
        .await?;

    let first = h.service.get_history("s1").await?;
    assert_eq!(first.len(), 2);
    assert_eq!(h.repo.list_calls(), 1);
    assert!(h.backend.contains_key("chat_history:s1"));

    // Within the TTL the second read is served from the cache.
    let second = h.service.get_history("s1").await?;
    assert_eq!(h.repo.list_calls(), 1, "cached read must not touch the store");

    // And the cached copy is exactly the durable content.
    let ids_first: Vec<_> = first.iter().map(|m| m.message_id).collect();
    let ids_second: Vec<_> = second.iter().map(|m| m.message_id).collect();
    assert_eq!(ids_first, ids_second);

    Ok(())
}

#[tokio::test]
async fn write_invalidates_so_reads_never_see_the_stale_snapshot() -> Result<(), Error> {
    let h = build_service();

    h.service
        .send_message(&new_message("s1", "user", "first"))
        .await?;
    let before = h.service.get_history("s1").await?;
    assert_eq!(before.len(), 1);
    assert!(h.backend.contains_key("chat_history:s1"));

    // The append deletes the entry as part of the write path.
    h.service
        .send_message(&new_message("s1", "user", "second"))
        .await?;
    assert!(!h.backend.contains_key("chat_history:s1"));

    let after = h.service.get_history("s1").await?;
    assert_eq!(after.len(), 2);
    assert_eq!(after[1].content, "second");

    Ok(())
}

#[tokio::test]
async fn messages_come_back_in_conversational_order() -> Result<(), Error> {
    let h = build_service();

    for i in 0..5 {
        h.service
            .send_message(&new_message("s1", "user", &format!("message {}", i)))
            .await?;
    }

    let history = h.service.get_history("s1").await?;
    let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["message 0", "message 1", "message 2", "message 3", "message 4"]
    );

    Ok(())
}

#[tokio::test]
async fn unreachable_cache_backend_never_breaks_reads_or_writes() -> Result<(), Error> {
    let h = build_service();
    h.backend.set_unreachable(true);

    h.service
        .send_message(&new_message("s1", "user", "hello"))
        .await?;
    let history = h.service.get_history("s1").await?;
    assert_eq!(history.len(), 1);

    // Every read goes to the store while the cache is down.
    h.service.get_history("s1").await?;
    assert_eq!(h.repo.list_calls(), 2);
    assert!(!h.service.cache_ping().await);

    h.service.clear_session("s1").await?;
    assert!(h.service.get_history("s1").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn clear_session_removes_messages_and_evicts_the_entry() -> Result<(), Error> {
    let h = build_service();

    h.service
        .send_message(&new_message("s1", "user", "one"))
        .await?;
    h.service
        .send_message(&new_message("s1", "user", "two"))
        .await?;
    h.service.get_history("s1").await?;
    assert!(h.backend.contains_key("chat_history:s1"));

    let removed = h.service.clear_session("s1").await?;
    assert_eq!(removed, 2);
    assert!(!h.backend.contains_key("chat_history:s1"));

    let history = h.service.get_history("s1").await?;
    assert!(history.is_empty());
    assert_eq!(h.service.count_messages("s1").await?, 0);

    Ok(())
}

#[tokio::test]
async fn expired_entry_forces_a_durable_re_read() -> Result<(), Error> {
    let h = build_service();

    h.service
        .send_message(&new_message("s1", "user", "hello"))
        .await?;
    h.service.get_history("s1").await?;
    assert_eq!(h.repo.list_calls(), 1);

    // Past the TTL the snapshot no longer counts.
    h.backend.advance(Duration::from_secs(300));
    h.service.get_history("s1").await?;
    assert_eq!(h.repo.list_calls(), 2);

    Ok(())
}

#[tokio::test]
async fn user_messages_are_sentiment_tagged_other_roles_are_not() -> Result<(), Error> {
    let h = build_service();

    let tagged = h
        .service
        .send_message(&new_message("s1", "user", "this is great, I love it!"))
        .await?;
    assert_eq!(tagged.sentiment_label.as_deref(), Some("Positive"));
    assert!(tagged.sentiment_score.unwrap() > 0.0);
    assert_eq!(tagged.tone.as_deref(), Some("Enthusiastic"));

    let untagged = h
        .service
        .send_message(&new_message("s1", "assistant", "this is great, I love it!"))
        .await?;
    assert!(untagged.sentiment_label.is_none());
    assert!(untagged.sentiment_score.is_none());
    assert!(untagged.tone.is_none());

    Ok(())
}

#[tokio::test]
async fn invalid_input_is_rejected_before_storage() {
    let h = build_service();

    let bad_role = h
        .service
        .send_message(&new_message("s1", "narrator", "hello"))
        .await;
    assert!(matches!(bad_role, Err(Error::Validation(_))));

    let empty_content = h.service.send_message(&new_message("s1", "user", "   ")).await;
    assert!(matches!(empty_content, Err(Error::Validation(_))));

    let empty_session = h.service.get_history("").await;
    assert!(matches!(empty_session, Err(Error::Validation(_))));

    let long_session = "x".repeat(201);
    let too_long = h.service.get_history(&long_session).await;
    assert!(matches!(too_long, Err(Error::Validation(_))));
}

#[tokio::test]
async fn sessions_are_isolated() -> Result<(), Error> {
    let h = build_service();

    h.service
        .send_message(&new_message("s1", "user", "for s1"))
        .await?;
    h.service
        .send_message(&new_message("s2", "user", "for s2"))
        .await?;

    h.service.clear_session("s1").await?;

    assert!(h.service.get_history("s1").await?.is_empty());
    let s2 = h.service.get_history("s2").await?;
    assert_eq!(s2.len(), 1);
    assert_eq!(s2[0].content, "for s2");

    Ok(())
}
