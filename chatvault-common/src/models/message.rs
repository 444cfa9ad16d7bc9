// File: chatvault-common/src/models/message.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::sentiment::Sentiment;

/// Who authored a message within a session.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

impl FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A single persisted chat message. Immutable once created; the only delete
/// is a whole-session clear.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct ChatMessage {
    pub message_id: Uuid,
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
    pub tone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a message ready for insertion, stamping id and timestamp.
    pub fn new(session_id: &str, role: Role, content: &str, sentiment: Option<Sentiment>) -> Self {
        let (label, score, tone) = match sentiment {
            Some(s) => (
                Some(s.label.to_string()),
                Some(s.score),
                Some(s.tone.to_string()),
            ),
            None => (None, None, None),
        };
        Self {
            message_id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            sentiment_label: label,
            sentiment_score: score,
            tone,
            created_at: Utc::now(),
        }
    }
}

/// Incoming payload for a message append, before ids and sentiment exist.
#[derive(Debug, Deserialize, Clone)]
pub struct NewMessage {
    pub session_id: String,
    pub role: String,
    pub content: String,
}
