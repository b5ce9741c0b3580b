//! PostgreSQL implementation of AttachmentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::{MessageAttachment, NewAttachment};
use market_core::traits::{AttachmentRepository, RepoResult};

use crate::models::AttachmentModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AttachmentRepository
#[derive(Clone)]
pub struct PgAttachmentRepository {
    pool: PgPool,
}

impl PgAttachmentRepository {
    /// Create a new PgAttachmentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttachmentRepository for PgAttachmentRepository {
    #[instrument(skip(self, attachments), fields(count = attachments.len()))]
    async fn create_many(
        &self,
        message_id: Uuid,
        attachments: &[NewAttachment],
    ) -> RepoResult<Vec<MessageAttachment>> {
        if attachments.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut created = Vec::with_capacity(attachments.len());

        for attachment in attachments {
            let row = sqlx::query_as::<_, AttachmentModel>(
                r#"
                INSERT INTO message_attachments
                    (id, message_id, url, content_type, storage_path, mime_type, size_bytes, name)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, message_id, url, content_type, storage_path, mime_type, size_bytes, name
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(message_id)
            .bind(&attachment.url)
            .bind(&attachment.content_type)
            .bind(&attachment.storage_path)
            .bind(&attachment.mime_type)
            .bind(attachment.size_bytes)
            .bind(&attachment.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            created.push(MessageAttachment::from(row));
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(created)
    }

    #[instrument(skip(self, message_ids), fields(count = message_ids.len()))]
    async fn find_by_messages(&self, message_ids: &[Uuid]) -> RepoResult<Vec<MessageAttachment>> {
        if message_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, AttachmentModel>(
            r#"
            SELECT id, message_id, url, content_type, storage_path, mime_type, size_bytes, name
            FROM message_attachments
            WHERE message_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(message_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(MessageAttachment::from).collect())
    }
}
