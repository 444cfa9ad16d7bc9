use serde::{Deserialize, Serialize};

/// Configuration for the model provider behind sentiment and RAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL for API requests; defaults to the OpenAI endpoint.
    pub api_base: Option<String>,

    /// API key for authentication.
    pub api_key: String,

    /// Model used for chat completions (RAG answers, model-based sentiment).
    pub chat_model: String,

    /// Model used for text embeddings.
    pub embedding_model: String,
}
