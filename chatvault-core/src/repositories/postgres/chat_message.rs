// src/repositories/postgres/chat_message.rs

use sqlx::{Pool, Postgres, Row};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::Error;
use chatvault_common::models::{ChatMessage, Role};
use chatvault_common::traits::ChatMessageRepository;

#[derive(Clone)]
pub struct PostgresChatMessageRepository {
    pool: Pool<Postgres>,
}

impl PostgresChatMessageRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatMessageRepository for PostgresChatMessageRepository {
    async fn insert_message(&self, msg: &ChatMessage) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (
                message_id,
                session_id,
                role,
                content,
                sentiment_label,
                sentiment_score,
                tone,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#
        )
            .bind(msg.message_id)
            .bind(&msg.session_id)
            .bind(msg.role.to_string())
            .bind(&msg.content)
            .bind(&msg.sentiment_label)
            .bind(msg.sentiment_score)
            .bind(&msg.tone)
            .bind(msg.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<ChatMessage>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT message_id,
                   session_id,
                   role,
                   content,
                   sentiment_label,
                   sentiment_score,
                   tone,
                   created_at
            FROM chat_messages
            WHERE session_id = $1
            ORDER BY created_at ASC, message_id ASC
            "#
        )
            .bind(session_id)
            .fetch_all(&self.pool)
            .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for r in rows {
            let role_str: String = r.try_get("role")?;
            let role = role_str
                .parse::<Role>()
                .map_err(Error::Parse)?;
            messages.push(ChatMessage {
                message_id: r.try_get("message_id")?,
                session_id: r.try_get("session_id")?,
                role,
                content: r.try_get("content")?,
                sentiment_label: r.try_get("sentiment_label")?,
                sentiment_score: r.try_get("sentiment_score")?,
                tone: r.try_get("tone")?,
                created_at: r.try_get::<DateTime<Utc>, _>("created_at")?,
            });
        }
        Ok(messages)
    }

    async fn delete_session(&self, session_id: &str) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM chat_messages
            WHERE session_id = $1
            "#
        )
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_for_session(&self, session_id: &str) -> Result<i64, Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS message_count
            FROM chat_messages
            WHERE session_id = $1
            "#
        )
            .bind(session_id)
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("message_count")?;
        Ok(count)
    }
}
