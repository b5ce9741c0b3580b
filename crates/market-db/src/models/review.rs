//! Review database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for reviews table
#[derive(Debug, Clone, FromRow)]
pub struct ReviewModel {
    pub id: Uuid,
    pub listing_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub author_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Review joined with author name and avatar
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithAuthorModel {
    #[sqlx(flatten)]
    pub review: ReviewModel,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
}

/// One `(business_id, rating)` row used for average computation
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RatingRowModel {
    pub business_id: Uuid,
    pub rating: i16,
}
