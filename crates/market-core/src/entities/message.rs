//! Message entity - a single entry in a conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new Message
    pub fn new(id: Uuid, conversation_id: Uuid, sender_id: Uuid, body: String) -> Self {
        Self {
            id,
            conversation_id,
            sender_id,
            body,
            created_at: Utc::now(),
            edited_at: None,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Body as shown to clients; deleted messages keep their row but lose the text
    pub fn visible_body(&self) -> &str {
        if self.is_deleted() {
            ""
        } else {
            &self.body
        }
    }

    /// Whether the other participant has seen this message
    pub fn is_read_by(&self, other_last_read_at: Option<DateTime<Utc>>) -> bool {
        other_last_read_at.is_some_and(|read_at| self.created_at <= read_at)
    }
}

/// Attachment row as stored
///
/// Older rows carry a direct `url`/`content_type`, newer rows a storage path
/// with `mime_type`/`size_bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAttachment {
    pub id: Uuid,
    pub message_id: Uuid,
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub storage_path: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub name: Option<String>,
}

/// Attachment as delivered to clients, always with a url
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAttachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub url: String,
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub storage_path: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
}

/// Attachment supplied when sending a message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewAttachment {
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub storage_path: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub name: Option<String>,
}

impl NewAttachment {
    /// An attachment needs either a url or a storage path
    pub fn is_usable(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.url) || present(&self.storage_path)
    }
}

/// Public object url for a storage path
pub fn public_object_url(public_base: &str, bucket: &str, storage_path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        public_base.trim_end_matches('/'),
        bucket,
        storage_path.trim_start_matches('/')
    )
}

impl MessageAttachment {
    /// Resolve to a renderable attachment; `None` when no url can be derived
    pub fn normalize(&self, public_base: &str, bucket: &str) -> Option<NormalizedAttachment> {
        let url = match (self.url.as_deref(), self.storage_path.as_deref()) {
            (Some(url), _) if !url.is_empty() => url.to_string(),
            (_, Some(path)) if !path.is_empty() => public_object_url(public_base, bucket, path),
            _ => return None,
        };

        Some(NormalizedAttachment {
            id: Some(self.id),
            url,
            content_type: self.content_type.clone().or_else(|| self.mime_type.clone()),
            name: self.name.clone(),
            storage_path: self.storage_path.clone(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment() -> MessageAttachment {
        MessageAttachment {
            id: Uuid::new_v4(),
            message_id: Uuid::new_v4(),
            url: None,
            content_type: None,
            storage_path: None,
            mime_type: None,
            size_bytes: None,
            name: None,
        }
    }

    #[test]
    fn test_deleted_message_hides_body() {
        let mut msg = Message::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), "Hallo".to_string());
        assert_eq!(msg.visible_body(), "Hallo");
        msg.deleted_at = Some(Utc::now());
        assert!(msg.is_deleted());
        assert_eq!(msg.visible_body(), "");
    }

    #[test]
    fn test_is_read_by() {
        let msg = Message::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), "Hallo".to_string());
        assert!(!msg.is_read_by(None));
        assert!(msg.is_read_by(Some(msg.created_at)));
        assert!(!msg.is_read_by(Some(msg.created_at - chrono::Duration::seconds(1))));
    }

    #[test]
    fn test_normalize_legacy_url() {
        let mut att = attachment();
        att.url = Some("https://cdn.example/file.pdf".to_string());
        att.content_type = Some("application/pdf".to_string());

        let n = att.normalize("https://proj.supabase.co", "chat-attachments").unwrap();
        assert_eq!(n.url, "https://cdn.example/file.pdf");
        assert_eq!(n.content_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_normalize_storage_path() {
        let mut att = attachment();
        att.storage_path = Some("/conv/photo.png".to_string());
        att.mime_type = Some("image/png".to_string());
        att.size_bytes = Some(2048);

        let n = att.normalize("https://proj.supabase.co/", "chat-attachments").unwrap();
        assert_eq!(
            n.url,
            "https://proj.supabase.co/storage/v1/object/public/chat-attachments/conv/photo.png"
        );
        assert_eq!(n.content_type.as_deref(), Some("image/png"));
        assert_eq!(n.size_bytes, Some(2048));
    }

    #[test]
    fn test_normalize_drops_attachment_without_source() {
        assert!(attachment().normalize("https://x", "b").is_none());
    }

    #[test]
    fn test_new_attachment_is_usable() {
        assert!(!NewAttachment::default().is_usable());
        let att = NewAttachment {
            storage_path: Some("a/b.png".to_string()),
            ..NewAttachment::default()
        };
        assert!(att.is_usable());
    }
}
