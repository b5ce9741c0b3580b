//! Review service
//!
//! Handles reviews on listings and businesses. An author keeps one review per
//! target; submitting again overwrites it.

use market_cache::PubSubChannel;
use market_core::entities::{Review, ReviewTarget};
use market_core::events::{DomainEvent, ReviewSubmittedEvent};
use market_core::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{CreateReviewRequest, ItemsResponse, ReviewItem, ReviewListParams, SubmittedReview};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Reviews fetched per target
pub const REVIEWS_PER_TARGET: i64 = 100;

/// Listing wins when both ids are sent
fn review_target(listing_id: Option<Uuid>, business_id: Option<Uuid>) -> Option<ReviewTarget> {
    listing_id
        .map(ReviewTarget::Listing)
        .or(business_id.map(ReviewTarget::Business))
}

/// Rating in `1..=5` and a non-empty comment
fn checked_review(rating: i64, comment: &str) -> Result<(i16, String), DomainError> {
    let rating = i16::try_from(rating)
        .ok()
        .filter(|r| Review::is_valid_rating(*r))
        .ok_or(DomainError::InvalidRating(rating))?;
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(DomainError::EmptyComment);
    }
    Ok((rating, comment.to_string()))
}

/// Review service
pub struct ReviewService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReviewService<'a> {
    /// Create a new ReviewService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reviews of a listing and/or a business, merged without duplicates
    #[instrument(skip(self))]
    pub async fn list(&self, params: ReviewListParams) -> ServiceResult<ItemsResponse<ReviewItem>> {
        let targets = [
            params.listing_id.map(ReviewTarget::Listing),
            params.business_id.map(ReviewTarget::Business),
        ];

        let mut items: Vec<ReviewItem> = Vec::new();
        for target in targets.into_iter().flatten() {
            let rows = self
                .ctx
                .review_repo()
                .list_for_target(target, REVIEWS_PER_TARGET)
                .await?;
            for row in &rows {
                if !items.iter().any(|i| i.id == row.review.id) {
                    items.push(ReviewItem::from(row));
                }
            }
        }

        Ok(ItemsResponse::new(items))
    }

    /// Create the caller's review, or overwrite the one they already left
    #[instrument(skip(self, request))]
    pub async fn submit(&self, author_id: Uuid, request: CreateReviewRequest) -> ServiceResult<SubmittedReview> {
        let target = review_target(request.listing_id, request.business_id)
            .ok_or(DomainError::MissingReviewTarget)?;
        let (rating, comment) = checked_review(request.rating, &request.comment)?;

        let repo = self.ctx.review_repo();
        let review = Review::new(Uuid::new_v4(), target, author_id, rating, comment);
        let review_id = match repo.insert(&review).await {
            Ok(()) => review.id,
            Err(DomainError::ReviewAlreadyExists) => {
                repo.update_existing(target, author_id, rating, &review.comment)
                    .await?
                    .ok_or_else(|| ServiceError::internal("Kon bestaande review niet bijwerken"))?
                    .id
            }
            Err(e) => return Err(e.into()),
        };

        let stored = repo
            .find_with_author(review_id)
            .await?
            .ok_or(DomainError::ReviewNotFound)?;

        info!(review_id = %review_id, rating, "Review submitted");

        let event = DomainEvent::ReviewSubmitted(ReviewSubmittedEvent::new(
            review_id,
            target.listing_id(),
            target.business_id(),
            rating,
        ));
        let channel = match target {
            ReviewTarget::Listing(id) => PubSubChannel::listing(id),
            ReviewTarget::Business(id) => PubSubChannel::user(id),
        };
        self.ctx
            .publisher()
            .publish_domain_event(&channel, &event)
            .await
            .ok();

        Ok(SubmittedReview::from(&stored))
    }
}
