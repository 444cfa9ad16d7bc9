// File: chatvault-server/src/routes/chat.rs

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use chatvault_common::models::{ChatMessage, NewMessage};
use chatvault_common::Error;

use crate::context::ServerContext;

use super::ApiError;

/// GET /chat/history/{session_id} — full ordered history, cache-then-store.
pub async fn get_history(
    State(ctx): State<Arc<ServerContext>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = ctx.message_service.get_history(&session_id).await?;
    Ok(Json(messages))
}

/// POST /chat/send — append a message; user messages get sentiment tagging.
pub async fn send_message(
    State(ctx): State<Arc<ServerContext>>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    for field in ["session_id", "role", "content"] {
        if payload.get(field).and_then(|v| v.as_str()).is_none() {
            return Err(ApiError(Error::Validation(format!("Missing field: {}", field))));
        }
    }
    let new = NewMessage {
        session_id: payload["session_id"].as_str().unwrap_or_default().to_string(),
        role: payload["role"].as_str().unwrap_or_default().to_string(),
        content: payload["content"].as_str().unwrap_or_default().to_string(),
    };

    let msg = ctx.message_service.send_message(&new).await?;
    Ok(Json(json!({
        "status": "ok",
        "message_id": msg.message_id,
        "sentiment_label": msg.sentiment_label,
        "sentiment_score": msg.sentiment_score,
        "tone": msg.tone,
    })))
}

/// POST /chat/clear/{session_id} — drop the session from store and cache.
pub async fn clear_history(
    State(ctx): State<Arc<ServerContext>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removed = ctx.message_service.clear_session(&session_id).await?;
    Ok(Json(json!({ "status": "cleared", "removed": removed })))
}

/// GET /chat/cache/ping — cache backend health; "unreachable" also covers
/// running without a configured backend.
pub async fn cache_ping(State(ctx): State<Arc<ServerContext>>) -> Json<Value> {
    let ok = ctx.message_service.cache_ping().await;
    Json(json!({ "redis": if ok { "ok" } else { "unreachable" } }))
}

/// GET /chat/stats/{session_id} — message count straight from the store.
pub async fn session_stats(
    State(ctx): State<Arc<ServerContext>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let messages = ctx.message_service.count_messages(&session_id).await?;
    Ok(Json(json!({ "session_id": session_id, "messages": messages })))
}
