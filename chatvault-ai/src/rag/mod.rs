// File: chatvault-ai/src/rag/mod.rs

pub mod splitter;
pub mod index;
pub mod engine;

pub use splitter::RecursiveSplitter;
pub use index::{IndexedChunk, VectorIndex};
pub use engine::{RagConfig, RagEngine, ReindexReport};
