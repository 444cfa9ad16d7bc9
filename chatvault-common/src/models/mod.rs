// File: chatvault-common/src/models/mod.rs
pub mod message;
pub mod sentiment;
pub mod document;

pub use message::{ChatMessage, NewMessage, Role};
pub use sentiment::{Sentiment, SentimentLabel, Tone};
pub use document::{Answer, DocChunk, SourceRef};
