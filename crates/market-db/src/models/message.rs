//! Message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl MessageModel {
    /// Check if message is soft deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Projection of messages used for response-time analysis
#[derive(Debug, Clone, FromRow)]
pub struct ThreadMessageModel {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Database model for message_attachments table
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentModel {
    pub id: Uuid,
    pub message_id: Uuid,
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub storage_path: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub name: Option<String>,
}
