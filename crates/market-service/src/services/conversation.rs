//! Conversation service
//!
//! Handles opening conversations between two users and the inbox listing.

use tracing::{info, instrument};
use uuid::Uuid;

use market_core::entities::{Conversation, Profile};
use market_core::DomainError;

use crate::dto::{ConversationResponse, ConversationSummary, ParticipantSummary, StartConversationRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open the conversation for this pair and listing, creating it once
    #[instrument(skip(self, request))]
    pub async fn start(
        &self,
        user_id: Uuid,
        request: StartConversationRequest,
    ) -> ServiceResult<ConversationResponse> {
        let conversation = self
            .ensure(user_id, request.other_user_id, request.listing_id)
            .await?;
        Ok(ConversationResponse::from(&conversation))
    }

    /// Existing conversation for the sorted pair and listing, or a new one
    pub async fn ensure(
        &self,
        user_id: Uuid,
        other_id: Uuid,
        listing_id: Option<Uuid>,
    ) -> ServiceResult<Conversation> {
        if user_id == other_id {
            return Err(ServiceError::validation("Je kan geen gesprek met jezelf starten"));
        }

        let repo = self.ctx.conversation_repo();
        let pair = Conversation::sorted_pair(user_id, other_id);
        if let Some(existing) = repo.find_by_participants(pair, listing_id).await? {
            return Ok(existing);
        }

        let conversation = Conversation::new(Uuid::new_v4(), user_id, other_id, listing_id);
        match repo.create(&conversation).await {
            Ok(()) => {
                info!(conversation_id = %conversation.id, "Conversation created");
                Ok(conversation)
            }
            // Lost a race with the other participant
            Err(DomainError::ConversationAlreadyExists) => repo
                .find_by_participants(pair, listing_id)
                .await?
                .ok_or_else(|| ServiceError::internal("Conversation vanished after conflict")),
            Err(e) => Err(e.into()),
        }
    }

    /// Inbox: every conversation with the other participant, last message and unread count
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Uuid) -> ServiceResult<Vec<ConversationSummary>> {
        let conversations = self.ctx.conversation_repo().list_for_user(user_id).await?;

        let other_ids: Vec<Uuid> = conversations
            .iter()
            .filter_map(|c| c.other_participant(user_id))
            .collect();
        let profiles: Vec<Profile> = if other_ids.is_empty() {
            Vec::new()
        } else {
            self.ctx.profile_repo().find_many(&other_ids).await?
        };

        let messages = self.ctx.message_repo();
        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let other = conversation
                .other_participant(user_id)
                .and_then(|id| profiles.iter().find(|p| p.id == id))
                .map(ParticipantSummary::from);
            let last_message = messages
                .last_in_conversation(conversation.id)
                .await?
                .map(Into::into);
            let unread = messages
                .unread_in_conversation(conversation.id, user_id)
                .await?;

            summaries.push(ConversationSummary {
                conversation: ConversationResponse::from(&conversation),
                other,
                last_message,
                unread,
            });
        }

        Ok(summaries)
    }

    /// Get a conversation the user takes part in
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, conversation_id: Uuid) -> ServiceResult<ConversationResponse> {
        let conversation = self.participant_conversation(user_id, conversation_id).await?;
        Ok(ConversationResponse::from(&conversation))
    }

    /// Load a conversation; outsiders get the same 404 as a missing one
    pub async fn participant_conversation(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> ServiceResult<Conversation> {
        self.ctx
            .conversation_repo()
            .find_by_id(conversation_id)
            .await?
            .filter(|c| c.includes(user_id))
            .ok_or_else(|| DomainError::ConversationNotFound(conversation_id).into())
    }

    /// Whether the user takes part in the conversation
    pub async fn is_participant(&self, user_id: Uuid, conversation_id: Uuid) -> ServiceResult<bool> {
        Ok(self
            .ctx
            .conversation_repo()
            .find_by_id(conversation_id)
            .await?
            .is_some_and(|c| c.includes(user_id)))
    }
}
