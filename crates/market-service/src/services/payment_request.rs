//! Payment request service
//!
//! A buyer asks the seller for a payment link; the request lands in their
//! conversation about the listing as a regular chat message.

use tracing::{info, instrument};
use uuid::Uuid;

use market_core::value_objects::ShippingMode;
use market_core::DomainError;

use crate::dto::{PaymentRequestBody, PaymentRequestResponse};

use super::context::ServiceContext;
use super::conversation::ConversationService;
use super::error::ServiceResult;
use super::message::MessageService;

/// Without a shipping block the buyer is assumed to pick up
fn requested_mode(body: &PaymentRequestBody) -> ShippingMode {
    body.shipping
        .as_ref()
        .map_or(ShippingMode::Pickup, |s| s.mode)
}

/// Payment request service
pub struct PaymentRequestService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PaymentRequestService<'a> {
    /// Create a new PaymentRequestService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a payment request in the buyer-seller conversation for the listing
    #[instrument(skip(self, body))]
    pub async fn request(&self, buyer_id: Uuid, body: PaymentRequestBody) -> ServiceResult<PaymentRequestResponse> {
        let listing_id = body.listing_id.ok_or(DomainError::MissingListingId)?;
        let mode = requested_mode(&body);

        let listing = self
            .ctx
            .listing_repo()
            .find_by_id(listing_id)
            .await?
            .ok_or(DomainError::ListingNotFound(listing_id))?;
        if listing.seller_id.is_nil() {
            return Err(DomainError::SellerMissing.into());
        }
        if listing.is_owned_by(buyer_id) {
            return Err(DomainError::SelfRequest.into());
        }

        let conversation = ConversationService::new(self.ctx)
            .ensure(buyer_id, listing.seller_id, Some(listing_id))
            .await?;
        MessageService::new(self.ctx)
            .post_system_text(&conversation, buyer_id, mode.request_message())
            .await?;

        info!(
            listing_id = %listing_id,
            conversation_id = %conversation.id,
            mode = mode.as_str(),
            "Payment requested"
        );

        Ok(PaymentRequestResponse {
            ok: true,
            conversation_id: conversation.id,
            shipping_mode: mode.as_str().to_string(),
        })
    }
}
