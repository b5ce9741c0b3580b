//! Message and attachment entity <-> model mapper

use market_core::entities::{Message, MessageAttachment};
use market_core::value_objects::ThreadMessage;

use crate::models::{AttachmentModel, MessageModel, ThreadMessageModel};

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: model.id,
            conversation_id: model.conversation_id,
            sender_id: model.sender_id,
            body: model.body,
            created_at: model.created_at,
            edited_at: model.edited_at,
            deleted_at: model.deleted_at,
        }
    }
}

impl From<ThreadMessageModel> for ThreadMessage {
    fn from(model: ThreadMessageModel) -> Self {
        ThreadMessage {
            conversation_id: model.conversation_id,
            sender_id: model.sender_id,
            created_at: model.created_at,
        }
    }
}

/// Convert AttachmentModel to MessageAttachment entity
impl From<AttachmentModel> for MessageAttachment {
    fn from(model: AttachmentModel) -> Self {
        MessageAttachment {
            id: model.id,
            message_id: model.message_id,
            url: model.url,
            content_type: model.content_type,
            storage_path: model.storage_path,
            mime_type: model.mime_type,
            size_bytes: model.size_bytes,
            name: model.name,
        }
    }
}
