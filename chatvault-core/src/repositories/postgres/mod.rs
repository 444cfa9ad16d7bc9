// src/repositories/postgres/mod.rs

pub mod chat_message;

pub use chat_message::PostgresChatMessageRepository;
