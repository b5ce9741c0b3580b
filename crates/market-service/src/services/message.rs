//! Message service
//!
//! Handles sending, editing and deleting chat messages, and the paged history
//! with attachments and read receipts.

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use market_core::entities::{Conversation, Message, MessageAttachment, NewAttachment, NormalizedAttachment};
use market_core::events::{DomainEvent, MessageCreatedEvent, MessageDeletedEvent, MessageUpdatedEvent};
use market_core::traits::MessageQuery;
use market_core::DomainError;

use crate::dto::{
    EditMessageRequest, MessageListParams, MessageResponse, MessageWithDetails, SendMessageRequest,
    SuccessResponse,
};

use super::context::ServiceContext;
use super::conversation::ConversationService;
use super::error::{ServiceError, ServiceResult};

pub const DEFAULT_MESSAGE_PAGE: i64 = 50;
pub const MAX_MESSAGE_PAGE: i64 = 100;
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Trimmed body, rejecting empty and oversized text
fn checked_body(body: &str, allow_empty: bool) -> Result<String, DomainError> {
    let body = body.trim();
    if body.is_empty() && !allow_empty {
        return Err(DomainError::EmptyMessage);
    }
    if body.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(DomainError::ContentTooLong {
            max: MAX_MESSAGE_LENGTH,
        });
    }
    Ok(body.to_string())
}

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Page backwards through a conversation, returned oldest first
    #[instrument(skip(self, params))]
    pub async fn list(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        params: MessageListParams,
    ) -> ServiceResult<Vec<MessageResponse>> {
        let conversation = ConversationService::new(self.ctx)
            .participant_conversation(user_id, conversation_id)
            .await?;

        let query = MessageQuery {
            before: params.before,
            limit: params
                .limit
                .unwrap_or(DEFAULT_MESSAGE_PAGE)
                .clamp(1, MAX_MESSAGE_PAGE),
        };
        let mut messages = self
            .ctx
            .message_repo()
            .find_by_conversation(conversation_id, query)
            .await?;
        messages.reverse();

        let ids: Vec<Uuid> = messages.iter().map(|m| m.id).collect();
        let attachments = if ids.is_empty() {
            Vec::new()
        } else {
            self.ctx.attachment_repo().find_by_messages(&ids).await?
        };

        let other_read = match conversation.other_participant(user_id) {
            Some(other) => self
                .ctx
                .read_repo()
                .find(conversation_id, other)
                .await?
                .map(|r| r.last_read_at),
            None => None,
        };

        Ok(messages
            .into_iter()
            .map(|message| {
                let own = message.sender_id == user_id;
                let attachments = self.normalize(
                    attachments.iter().filter(|a| a.message_id == message.id),
                );
                MessageResponse::from(MessageWithDetails {
                    message,
                    attachments,
                    other_last_read_at: own.then_some(other_read),
                })
            })
            .collect())
    }

    /// Send a message with optional attachments
    #[instrument(skip(self, request))]
    pub async fn send(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let conversation = ConversationService::new(self.ctx)
            .participant_conversation(user_id, conversation_id)
            .await?;

        let uploads: Vec<NewAttachment> = request
            .attachments
            .into_iter()
            .filter(NewAttachment::is_usable)
            .collect();
        let body = checked_body(&request.body, !uploads.is_empty())?;

        self.check_rate_limit(user_id).await?;

        let message = Message::new(Uuid::new_v4(), conversation_id, user_id, body);
        self.ctx.message_repo().create(&message).await?;

        let stored = if uploads.is_empty() {
            Vec::new()
        } else {
            self.ctx
                .attachment_repo()
                .create_many(message.id, &uploads)
                .await?
        };
        self.ctx.conversation_repo().touch(conversation_id).await?;

        info!(message_id = %message.id, conversation_id = %conversation_id, "Message sent");

        let event = DomainEvent::MessageCreated(MessageCreatedEvent::new(
            message.id,
            conversation_id,
            user_id,
            conversation.participants(),
            message.body.clone(),
            message.created_at,
        ));
        self.publish(&conversation, &event).await;

        Ok(MessageResponse::from(MessageWithDetails {
            attachments: self.normalize(stored.iter()),
            message,
            other_last_read_at: Some(None),
        }))
    }

    /// Persist a message built elsewhere (payment requests) and notify both sides
    pub async fn post_system_text(
        &self,
        conversation: &Conversation,
        sender_id: Uuid,
        body: &str,
    ) -> ServiceResult<Message> {
        let message = Message::new(Uuid::new_v4(), conversation.id, sender_id, body.to_string());
        self.ctx.message_repo().create(&message).await?;
        self.ctx.conversation_repo().touch(conversation.id).await?;

        let event = DomainEvent::MessageCreated(MessageCreatedEvent::new(
            message.id,
            conversation.id,
            sender_id,
            conversation.participants(),
            message.body.clone(),
            message.created_at,
        ));
        self.publish(conversation, &event).await;
        Ok(message)
    }

    /// Edit the body of one's own message
    #[instrument(skip(self, request))]
    pub async fn edit(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        request: EditMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let (mut message, conversation) = self.own_message(user_id, message_id).await?;
        if message.is_deleted() {
            return Err(DomainError::MessageDeleted.into());
        }

        let body = checked_body(&request.body, false)?;
        let edited_at = Utc::now();
        self.ctx
            .message_repo()
            .update_body(message_id, &body, edited_at)
            .await?;
        message.body = body;
        message.edited_at = Some(edited_at);

        info!(message_id = %message_id, "Message edited");

        let event = DomainEvent::MessageUpdated(MessageUpdatedEvent::new(
            message_id,
            conversation.id,
            message.body.clone(),
            edited_at,
        ));
        self.publish(&conversation, &event).await;

        let attachments = self
            .ctx
            .attachment_repo()
            .find_by_messages(&[message_id])
            .await?;
        let other_read = match conversation.other_participant(user_id) {
            Some(other) => self
                .ctx
                .read_repo()
                .find(conversation.id, other)
                .await?
                .map(|r| r.last_read_at),
            None => None,
        };

        Ok(MessageResponse::from(MessageWithDetails {
            attachments: self.normalize(attachments.iter()),
            message,
            other_last_read_at: Some(other_read),
        }))
    }

    /// Soft delete one's own message
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, message_id: Uuid) -> ServiceResult<SuccessResponse> {
        let (message, conversation) = self.own_message(user_id, message_id).await?;
        if message.is_deleted() {
            return Ok(SuccessResponse::ok());
        }

        self.ctx
            .message_repo()
            .soft_delete(message_id, Utc::now())
            .await?;

        info!(message_id = %message_id, "Message deleted");

        let event = DomainEvent::MessageDeleted(MessageDeletedEvent::new(message_id, conversation.id));
        self.publish(&conversation, &event).await;

        Ok(SuccessResponse::ok())
    }

    // === Helper methods ===

    /// Sliding window over the sender's recent messages
    async fn check_rate_limit(&self, user_id: Uuid) -> ServiceResult<()> {
        let limits = self.ctx.messaging();
        let window = i64::try_from(limits.window_secs).unwrap_or(i64::MAX);
        let since = Utc::now() - Duration::seconds(window);
        let recent = self
            .ctx
            .message_repo()
            .count_recent_by_sender(user_id, since)
            .await?;

        if recent >= i64::from(limits.max_messages) {
            warn!(user_id = %user_id, recent, "Message rate limit hit");
            return Err(DomainError::RateLimited {
                retry_after_secs: limits.window_secs,
            }
            .into());
        }
        Ok(())
    }

    async fn own_message(&self, user_id: Uuid, message_id: Uuid) -> ServiceResult<(Message, Conversation)> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;
        if message.sender_id != user_id {
            return Err(DomainError::NotMessageSender.into());
        }

        let conversation = self
            .ctx
            .conversation_repo()
            .find_by_id(message.conversation_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation", message.conversation_id.to_string()))?;
        Ok((message, conversation))
    }

    fn normalize<'b>(&self, rows: impl Iterator<Item = &'b MessageAttachment>) -> Vec<NormalizedAttachment> {
        let storage = self.ctx.storage();
        rows.filter_map(|a| a.normalize(&storage.public_url, &storage.chat_bucket))
            .collect()
    }

    async fn publish(&self, conversation: &Conversation, event: &DomainEvent) {
        self.ctx
            .publisher()
            .publish_to_conversation(conversation.id, conversation.participants(), event)
            .await
            .ok();
    }
}
