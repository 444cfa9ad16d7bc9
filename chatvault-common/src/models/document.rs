// File: chatvault-common/src/models/document.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One chunk of extracted document text, pre-embedding.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocChunk {
    pub chunk_id: Uuid,
    /// File name within the knowledge directory.
    pub source: String,
    /// 1-based page number the chunk was extracted from.
    pub page: u32,
    pub text: String,
}

/// Where an answer came from: file + page, deduplicated.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq, Hash)]
pub struct SourceRef {
    pub source: String,
    pub page: u32,
}

/// A retrieval-augmented answer with its supporting sources.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}
