//! In-memory vector index over embedded document chunks.
//!
//! Ranking is cosine similarity; the whole index round-trips through a JSON
//! sidecar file so previously embedded chunks survive restarts without
//! another pass through the embedding API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use chatvault_common::models::DocChunk;

/// A chunk plus its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub chunk: DocChunk,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    entries: Vec<IndexedChunk>,
}

/// Cosine similarity between two equal-length vectors. Returns 0.0 on length
/// mismatch, empty input, or zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, chunk: DocChunk, embedding: Vec<f32>) {
        self.entries.push(IndexedChunk { chunk, embedding });
    }

    /// Top-k entries by cosine similarity against `query`, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(IndexedChunk, f32)> {
        let mut scored: Vec<(IndexedChunk, f32)> = self
            .entries
            .iter()
            .map(|e| (e.clone(), cosine_similarity(query, &e.embedding)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Load the index from its JSON sidecar; missing or unreadable files
    /// yield an empty index.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Failed to parse vector index at {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist the index to its JSON sidecar. Failures are logged rather
    /// than returned; the in-memory index keeps working either way.
    pub fn save(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Failed to create index directory: {}", e);
                return;
            }
        }
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    warn!("Failed to write vector index to {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("Failed to serialize vector index: {}", e),
        }
    }
}
