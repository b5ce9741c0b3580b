//! PostgreSQL implementation of ConversationReadRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::ConversationRead;
use market_core::traits::{ConversationReadRepository, RepoResult};

use crate::models::ConversationReadModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ConversationReadRepository
#[derive(Clone)]
pub struct PgConversationReadRepository {
    pool: PgPool,
}

impl PgConversationReadRepository {
    /// Create a new PgConversationReadRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationReadRepository for PgConversationReadRepository {
    #[instrument(skip(self))]
    async fn upsert(&self, conversation_id: Uuid, user_id: Uuid, at: DateTime<Utc>) -> RepoResult<()> {
        // The marker never moves backwards
        sqlx::query(
            r#"
            INSERT INTO conversation_reads (conversation_id, user_id, last_read_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (conversation_id, user_id)
            DO UPDATE SET last_read_at = GREATEST(conversation_reads.last_read_at, EXCLUDED.last_read_at)
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, conversation_id: Uuid, user_id: Uuid) -> RepoResult<Option<ConversationRead>> {
        let row = sqlx::query_as::<_, ConversationReadModel>(
            r#"
            SELECT conversation_id, user_id, last_read_at
            FROM conversation_reads
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(ConversationRead::from))
    }
}
