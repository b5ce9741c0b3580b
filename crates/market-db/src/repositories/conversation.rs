//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::Conversation;
use market_core::error::DomainError;
use market_core::traits::{ConversationRepository, RepoResult};

use crate::models::ConversationModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT id, participants, listing_id, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Conversation::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_participants(
        &self,
        participants: [Uuid; 2],
        listing_id: Option<Uuid>,
    ) -> RepoResult<Option<Conversation>> {
        let sorted = Conversation::sorted_pair(participants[0], participants[1]);

        let row = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT id, participants, listing_id, created_at, updated_at
            FROM conversations
            WHERE participants = $1 AND listing_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(&sorted[..])
        .bind(listing_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Conversation::try_from).transpose()
    }

    #[instrument(skip(self, conversation), fields(conversation_id = %conversation.id))]
    async fn create(&self, conversation: &Conversation) -> RepoResult<()> {
        let participants = conversation.participants();

        sqlx::query(
            r#"
            INSERT INTO conversations (id, participants, listing_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(conversation.id)
        .bind(&participants[..])
        .bind(conversation.listing_id)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ConversationAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT id, participants, listing_id, created_at, updated_at
            FROM conversations
            WHERE $1 = ANY(participants)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Conversation::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn touch(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConversationNotFound(id));
        }

        Ok(())
    }
}
