//! Bid service
//!
//! Handles offers on listings that accept them.

use market_cache::PubSubChannel;
use market_core::entities::Bid;
use market_core::events::{BidPlacedEvent, DomainEvent};
use market_core::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{BidItem, BidResponse, BidSummaryResponse, PlaceBidRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Bid service
pub struct BidService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BidService<'a> {
    /// Create a new BidService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Place a bid and notify the seller
    #[instrument(skip(self, request))]
    pub async fn place(
        &self,
        bidder_id: Uuid,
        listing_id: Uuid,
        request: PlaceBidRequest,
    ) -> ServiceResult<BidResponse> {
        if !Bid::is_valid_amount(request.amount) {
            return Err(DomainError::InvalidAmount.into());
        }

        let listing = self
            .ctx
            .listing_repo()
            .find_by_id(listing_id)
            .await?
            .ok_or(DomainError::ListingNotFound(listing_id))?;
        if !listing.allow_offers {
            return Err(DomainError::OffersNotAllowed.into());
        }
        if listing.is_owned_by(bidder_id) {
            return Err(DomainError::OwnListingBid.into());
        }

        let bid = Bid::new(Uuid::new_v4(), listing_id, bidder_id, request.amount);
        self.ctx.bid_repo().create(&bid).await?;

        info!(bid_id = %bid.id, listing_id = %listing_id, amount = bid.amount, "Bid placed");

        let event = DomainEvent::BidPlaced(BidPlacedEvent::new(
            bid.id,
            listing_id,
            listing.seller_id,
            bidder_id,
            bid.amount,
        ));
        self.ctx
            .publisher()
            .publish_domain_event(&PubSubChannel::user(listing.seller_id), &event)
            .await
            .ok();

        Ok(BidResponse::from(&bid))
    }

    /// Bids on a listing, highest first
    #[instrument(skip(self))]
    pub async fn list(&self, listing_id: Uuid) -> ServiceResult<Vec<BidItem>> {
        let rows = self.ctx.bid_repo().list_for_listing(listing_id).await?;
        Ok(rows.iter().map(BidItem::from).collect())
    }

    /// Highest amount and number of bids
    #[instrument(skip(self))]
    pub async fn summary(&self, listing_id: Uuid) -> ServiceResult<BidSummaryResponse> {
        let (highest, count) = self.ctx.bid_repo().summary(listing_id).await?;
        Ok(BidSummaryResponse { highest, count })
    }
}
