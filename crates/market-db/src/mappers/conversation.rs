//! Conversation entity <-> model mapper

use market_core::entities::{Conversation, ConversationRead};
use market_core::error::DomainError;

use crate::models::{ConversationModel, ConversationReadModel};

impl TryFrom<ConversationModel> for Conversation {
    type Error = DomainError;

    fn try_from(model: ConversationModel) -> Result<Self, Self::Error> {
        let participants: [_; 2] = model.participants.try_into().map_err(|p: Vec<_>| {
            DomainError::InternalError(format!(
                "conversation {} has {} participants",
                model.id,
                p.len()
            ))
        })?;

        Ok(Conversation::from_parts(
            model.id,
            participants,
            model.listing_id,
            model.created_at,
            model.updated_at,
        ))
    }
}

impl From<ConversationReadModel> for ConversationRead {
    fn from(model: ConversationReadModel) -> Self {
        ConversationRead {
            conversation_id: model.conversation_id,
            user_id: model.user_id,
            last_read_at: model.last_read_at,
        }
    }
}
