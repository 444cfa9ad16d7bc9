use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use chatvault_ai::rag::{RagEngine, ReindexReport};
use chatvault_common::models::Answer;

use crate::Error;

/// Orchestrates the uploaded-document side: PDFs land in the knowledge
/// directory, get indexed by the RAG engine, and back question answering.
pub struct KnowledgeService {
    engine: Arc<RagEngine>,
    knowledge_dir: PathBuf,
}

impl KnowledgeService {
    pub fn new(engine: Arc<RagEngine>, knowledge_dir: PathBuf) -> Result<Self, Error> {
        std::fs::create_dir_all(&knowledge_dir)?;
        Ok(Self {
            engine,
            knowledge_dir,
        })
    }

    /// Persist an uploaded PDF into the knowledge directory.
    ///
    /// The file name must be a bare `*.pdf` name; path separators and parent
    /// references are rejected so uploads cannot escape the directory.
    pub async fn store_pdf(&self, filename: &str, bytes: &[u8]) -> Result<String, Error> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(Error::Validation("missing file name".into()));
        }
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(Error::Validation(format!("invalid file name: {}", filename)));
        }
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(Error::Validation(format!("not a PDF file: {}", filename)));
        }

        let path = self.knowledge_dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        info!("Stored uploaded PDF at {}", path.display());
        Ok(filename.to_string())
    }

    /// Re-scan the knowledge directory and rebuild the vector index.
    pub async fn reload(&self) -> Result<ReindexReport, Error> {
        self.engine.reindex().await
    }

    /// Answer a question from the indexed documents.
    pub async fn ask(&self, question: &str) -> Result<Answer, Error> {
        if question.trim().is_empty() {
            return Err(Error::Validation("question must not be empty".into()));
        }
        self.engine.ask(question).await
    }
}
