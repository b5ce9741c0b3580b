//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::Message;
use market_core::error::DomainError;
use market_core::traits::{MessageQuery, MessageRepository, RepoResult};
use market_core::value_objects::ThreadMessage;

use crate::models::{MessageModel, ThreadMessageModel};

use super::error::map_db_error;

/// Upper bound for one page of messages
const MAX_PAGE: i64 = 100;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, conversation_id, sender_id, body, created_at, edited_at, deleted_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_by_conversation(
        &self,
        conversation_id: Uuid,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>> {
        let limit = query.limit.clamp(1, MAX_PAGE);

        // Deleted rows stay in the page; callers blank their bodies
        let results = match query.before {
            Some(before) => {
                sqlx::query_as::<_, MessageModel>(
                    r#"
                    SELECT id, conversation_id, sender_id, body, created_at, edited_at, deleted_at
                    FROM messages
                    WHERE conversation_id = $1 AND created_at < $2
                    ORDER BY created_at DESC
                    LIMIT $3
                    "#,
                )
                .bind(conversation_id)
                .bind(before)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MessageModel>(
                    r#"
                    SELECT id, conversation_id, sender_id, body, created_at, edited_at, deleted_at
                    FROM messages
                    WHERE conversation_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(conversation_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn last_in_conversation(&self, conversation_id: Uuid) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, conversation_id, sender_id, body, created_at, edited_at, deleted_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.body)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn update_body(&self, id: Uuid, body: &str, edited_at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET body = $2, edited_at = $3
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(body)
        .bind(edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MessageNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Uuid, deleted_at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET deleted_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MessageNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_recent_by_sender(&self, sender_id: Uuid, since: DateTime<Utc>) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE sender_id = $1 AND created_at >= $2
            "#,
        )
        .bind(sender_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn unread_total(&self, user_id: Uuid) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages m
            JOIN conversations c ON c.id = m.conversation_id
            LEFT JOIN conversation_reads r
                ON r.conversation_id = m.conversation_id AND r.user_id = $1
            WHERE $1 = ANY(c.participants)
              AND m.sender_id <> $1
              AND m.deleted_at IS NULL
              AND (r.last_read_at IS NULL OR m.created_at > r.last_read_at)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn unread_in_conversation(&self, conversation_id: Uuid, user_id: Uuid) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages m
            LEFT JOIN conversation_reads r
                ON r.conversation_id = m.conversation_id AND r.user_id = $2
            WHERE m.conversation_id = $1
              AND m.sender_id <> $2
              AND m.deleted_at IS NULL
              AND (r.last_read_at IS NULL OR m.created_at > r.last_read_at)
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn thread_messages_for(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<ThreadMessage>> {
        let rows = sqlx::query_as::<_, ThreadMessageModel>(
            r#"
            SELECT m.conversation_id, m.sender_id, m.created_at
            FROM messages m
            JOIN conversations c ON c.id = m.conversation_id
            WHERE $1 = ANY(c.participants)
            ORDER BY m.created_at ASC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ThreadMessage::from).collect())
    }
}
