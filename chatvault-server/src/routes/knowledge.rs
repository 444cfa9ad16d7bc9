// File: chatvault-server/src/routes/knowledge.rs

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};

use chatvault_common::models::Answer;
use chatvault_common::Error;

use crate::context::ServerContext;

use super::ApiError;

/// POST /chat/upload_pdf — multipart upload into the knowledge directory.
pub async fn upload_pdf(
    State(ctx): State<Arc<ServerContext>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError(Error::Validation(format!("invalid multipart body: {}", e))))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError(Error::Validation("upload is missing a file name".into())))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError(Error::Validation(format!("failed reading upload: {}", e))))?;

        let stored = ctx.knowledge_service.store_pdf(&filename, &bytes).await?;
        return Ok(Json(json!({ "status": "ok", "filename": stored })));
    }
    Err(ApiError(Error::Validation("missing 'file' field".into())))
}

/// POST /chat/reload/pdfs — rebuild the vector index from disk.
pub async fn reload_pdfs(State(ctx): State<Arc<ServerContext>>) -> Result<Json<Value>, ApiError> {
    let report = ctx.knowledge_service.reload().await?;
    Ok(Json(json!({
        "status": "ok",
        "files_loaded": report.files,
        "chunks": report.chunks,
    })))
}

/// POST /chat/ask — retrieval-augmented answer over the indexed documents.
pub async fn ask(
    State(ctx): State<Arc<ServerContext>>,
    Json(payload): Json<Value>,
) -> Result<Json<Answer>, ApiError> {
    let question = payload
        .get("question")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError(Error::Validation("Missing field: question".into())))?;

    let answer = ctx.knowledge_service.ask(question).await?;
    Ok(Json(answer))
}
