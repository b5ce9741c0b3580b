//! Bid entity - an offer on a listing

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Name shown when a bidder has no profile name
pub const UNKNOWN_BIDDER: &str = "Onbekende gebruiker";

/// Bid entity
#[derive(Debug, Clone, PartialEq)]
pub struct Bid {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub bidder_id: Uuid,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Bid joined with the bidder's display name
#[derive(Debug, Clone, PartialEq)]
pub struct BidWithBidder {
    pub bid: Bid,
    pub bidder_name: Option<String>,
}

impl Bid {
    pub fn new(id: Uuid, listing_id: Uuid, bidder_id: Uuid, amount: f64) -> Self {
        Self {
            id,
            listing_id,
            bidder_id,
            amount,
            created_at: Utc::now(),
        }
    }

    /// Amounts must be positive and finite
    #[inline]
    pub fn is_valid_amount(amount: f64) -> bool {
        amount.is_finite() && amount > 0.0
    }
}

impl BidWithBidder {
    pub fn bidder_name(&self) -> &str {
        self.bidder_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(UNKNOWN_BIDDER)
    }
}
