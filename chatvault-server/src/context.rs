//! chatvault-server/src/context.rs
//!
//! Defines the main "global" context (ServerContext) shared with every
//! request handler.

use std::sync::Arc;

use chatvault_core::db::Database;
use chatvault_core::repositories::postgres::PostgresChatMessageRepository;
use chatvault_core::services::{KnowledgeService, MessageService};

/// The global server context (a bag of references to the DB and services).
pub struct ServerContext {
    pub db: Database,
    pub message_service: Arc<MessageService<PostgresChatMessageRepository>>,
    pub knowledge_service: Arc<KnowledgeService>,
}
