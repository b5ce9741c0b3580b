//! Bid entity <-> model mapper

use market_core::entities::{Bid, BidWithBidder};

use crate::models::BidWithBidderModel;

impl From<BidWithBidderModel> for BidWithBidder {
    fn from(model: BidWithBidderModel) -> Self {
        BidWithBidder {
            bid: Bid {
                id: model.id,
                listing_id: model.listing_id,
                bidder_id: model.bidder_id,
                amount: model.amount,
                created_at: model.created_at,
            },
            bidder_name: model.bidder_name,
        }
    }
}
