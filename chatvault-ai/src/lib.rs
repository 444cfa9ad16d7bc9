// File: chatvault-ai/src/lib.rs

pub mod models;
pub mod provider;
pub mod sentiment;
pub mod pdf;
pub mod rag;

pub use models::ProviderConfig;
pub use provider::{ChatProvider, PromptMessage};
pub use sentiment::SentimentEngine;
