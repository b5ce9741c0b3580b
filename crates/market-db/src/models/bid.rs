//! Bid database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Bid row joined with the bidder's profile name
#[derive(Debug, Clone, FromRow)]
pub struct BidWithBidderModel {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub bidder_id: Uuid,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub bidder_name: Option<String>,
}
