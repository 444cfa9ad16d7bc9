// File: chatvault-server/src/routes/mod.rs

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use chatvault_common::Error;

use crate::context::ServerContext;

pub mod chat;
pub mod knowledge;

pub fn router(ctx: Arc<ServerContext>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/chat/history/{session_id}", get(chat::get_history))
        .route("/chat/send", post(chat::send_message))
        .route("/chat/clear/{session_id}", post(chat::clear_history))
        .route("/chat/cache/ping", get(chat::cache_ping))
        .route("/chat/stats/{session_id}", get(chat::session_stats))
        .route("/chat/upload_pdf", post(knowledge::upload_pdf))
        .route("/chat/reload/pdfs", post(knowledge::reload_pdfs))
        .route("/chat/ask", post(knowledge::ask))
        .with_state(ctx)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the chatvault API" }))
}

/// Maps the crate-wide error onto an HTTP response with a JSON detail body.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}
