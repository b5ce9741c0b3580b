//! Read marker service

use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use market_core::events::{ConversationReadEvent, DomainEvent};

use crate::dto::{OkResponse, UnreadResponse};

use super::context::ServiceContext;
use super::conversation::ConversationService;
use super::error::ServiceResult;

/// Read marker service
pub struct ReadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReadService<'a> {
    /// Create a new ReadService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Move the caller's read marker to now
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: Uuid, conversation_id: Uuid) -> ServiceResult<OkResponse> {
        let conversation = ConversationService::new(self.ctx)
            .participant_conversation(user_id, conversation_id)
            .await?;

        let now = Utc::now();
        self.ctx
            .read_repo()
            .upsert(conversation_id, user_id, now)
            .await?;
        debug!(conversation_id = %conversation_id, user_id = %user_id, "Conversation marked read");

        let event = DomainEvent::ConversationRead(ConversationReadEvent::new(conversation_id, user_id, now));
        self.ctx
            .publisher()
            .publish_to_conversation(conversation_id, conversation.participants(), &event)
            .await
            .ok();

        Ok(OkResponse::ok())
    }

    /// Unread messages across all conversations; zero for anonymous callers
    #[instrument(skip(self))]
    pub async fn unread_total(&self, user_id: Option<Uuid>) -> ServiceResult<UnreadResponse> {
        let unread = match user_id {
            Some(id) => self.ctx.message_repo().unread_total(id).await?,
            None => 0,
        };
        Ok(UnreadResponse { unread })
    }
}
