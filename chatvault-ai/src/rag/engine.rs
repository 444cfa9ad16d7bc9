use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use chatvault_common::models::{Answer, DocChunk, SourceRef};
use chatvault_common::Error;

use crate::pdf;
use crate::provider::{ChatProvider, PromptMessage};

use super::index::VectorIndex;
use super::splitter::RecursiveSplitter;

/// How many chunk texts go into one embedding request.
const EMBED_BATCH: usize = 64;

#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Directory scanned for `*.pdf` files.
    pub knowledge_dir: PathBuf,
    /// JSON sidecar holding the persisted index.
    pub index_path: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Retrieved chunks per question.
    pub top_k: usize,
}

impl RagConfig {
    pub fn for_dir(knowledge_dir: PathBuf) -> Self {
        let index_path = knowledge_dir.join("vector_index.json");
        Self {
            knowledge_dir,
            index_path,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
        }
    }
}

/// Outcome of a reindex pass.
#[derive(Debug, Clone, Copy)]
pub struct ReindexReport {
    pub files: usize,
    pub chunks: usize,
}

/// Retrieval pipeline over the knowledge directory: extract, split, embed,
/// index, and answer questions grounded in the retrieved excerpts.
pub struct RagEngine {
    provider: Arc<ChatProvider>,
    splitter: RecursiveSplitter,
    index: RwLock<VectorIndex>,
    config: RagConfig,
}

impl RagEngine {
    /// Build the engine, loading any previously persisted index so restarts
    /// do not re-embed the whole corpus.
    pub fn new(provider: Arc<ChatProvider>, config: RagConfig) -> Self {
        let splitter = RecursiveSplitter::new(config.chunk_size, config.chunk_overlap);
        let index = VectorIndex::load(&config.index_path);
        if !index.is_empty() {
            info!(
                "Loaded vector index with {} chunks from {}",
                index.len(),
                config.index_path.display()
            );
        }
        Self {
            provider,
            splitter,
            index: RwLock::new(index),
            config,
        }
    }

    /// Rebuild the index from every PDF in the knowledge directory.
    pub async fn reindex(&self) -> Result<ReindexReport, Error> {
        let mut chunks: Vec<DocChunk> = Vec::new();
        let mut files = 0usize;

        let entries = match std::fs::read_dir(&self.config.knowledge_dir) {
            Ok(entries) => entries,
            Err(_) => {
                // Nothing uploaded yet; an empty index is a valid state.
                let mut index = self.index.write().await;
                *index = VectorIndex::new();
                index.save(&self.config.index_path);
                return Ok(ReindexReport { files: 0, chunks: 0 });
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_pdf = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            if !is_pdf {
                continue;
            }
            let source = entry.file_name().to_string_lossy().to_string();

            match pdf::extract_pages(&path) {
                Ok(pages) => {
                    files += 1;
                    for page in pages {
                        for text in self.splitter.split(&page.text) {
                            chunks.push(DocChunk {
                                chunk_id: Uuid::new_v4(),
                                source: source.clone(),
                                page: page.page,
                                text,
                            });
                        }
                    }
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        let mut new_index = VectorIndex::new();
        for batch in chunks.chunks(EMBED_BATCH) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.provider.embed(&texts).await?;
            for (chunk, embedding) in batch.iter().zip(embeddings) {
                new_index.insert(chunk.clone(), embedding);
            }
        }

        let total = new_index.len();
        new_index.save(&self.config.index_path);
        {
            let mut index = self.index.write().await;
            *index = new_index;
        }
        info!("Reindexed {} files into {} chunks", files, total);

        Ok(ReindexReport {
            files,
            chunks: total,
        })
    }

    /// Answer a question from the indexed excerpts.
    pub async fn ask(&self, question: &str) -> Result<Answer, Error> {
        let query = self
            .provider
            .embed(std::slice::from_ref(&question.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Ai("empty embedding response".into()))?;

        let hits = {
            let index = self.index.read().await;
            if index.is_empty() {
                return Err(Error::NotFound(
                    "no documents indexed; upload PDFs and reload first".into(),
                ));
            }
            index.search(&query, self.config.top_k)
        };

        let context = hits
            .iter()
            .map(|(entry, _)| {
                format!(
                    "[{} p.{}]\n{}",
                    entry.chunk.source, entry.chunk.page, entry.chunk.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let messages = [
            PromptMessage::system(
                "Answer the question using only the provided document excerpts. \
                 If the excerpts do not contain the answer, say you don't know.",
            ),
            PromptMessage::user(format!("Excerpts:\n\n{context}\n\nQuestion: {question}")),
        ];
        let answer = self.provider.chat(&messages).await?;

        // Dedup sources, keeping retrieval order.
        let mut sources: Vec<SourceRef> = Vec::new();
        for (entry, _) in &hits {
            let source = SourceRef {
                source: entry.chunk.source.clone(),
                page: entry.chunk.page,
            };
            if !sources.contains(&source) {
                sources.push(source);
            }
        }

        Ok(Answer { answer, sources })
    }
}
