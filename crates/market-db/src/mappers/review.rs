//! Review entity <-> model mapper

use market_core::entities::{Review, ReviewTarget, ReviewWithAuthor};
use market_core::error::DomainError;
use uuid::Uuid;

use crate::models::{ReviewModel, ReviewWithAuthorModel};

/// A review target split into its two nullable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewTargetColumns {
    pub listing_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
}

impl From<ReviewTarget> for ReviewTargetColumns {
    fn from(target: ReviewTarget) -> Self {
        Self {
            listing_id: target.listing_id(),
            business_id: target.business_id(),
        }
    }
}

impl TryFrom<ReviewModel> for Review {
    type Error = DomainError;

    fn try_from(model: ReviewModel) -> Result<Self, Self::Error> {
        let target = match (model.listing_id, model.business_id) {
            (Some(id), None) => ReviewTarget::Listing(id),
            (None, Some(id)) => ReviewTarget::Business(id),
            _ => {
                return Err(DomainError::InternalError(format!(
                    "review {} must target exactly one of listing or business",
                    model.id
                )))
            }
        };

        Ok(Review {
            id: model.id,
            target,
            author_id: model.author_id,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<ReviewWithAuthorModel> for ReviewWithAuthor {
    type Error = DomainError;

    fn try_from(model: ReviewWithAuthorModel) -> Result<Self, Self::Error> {
        Ok(ReviewWithAuthor {
            review: Review::try_from(model.review)?,
            author_name: model.author_name,
            author_avatar: model.author_avatar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(listing_id: Option<Uuid>, business_id: Option<Uuid>) -> ReviewModel {
        ReviewModel {
            id: Uuid::new_v4(),
            listing_id,
            business_id,
            author_id: Uuid::new_v4(),
            rating: 4,
            comment: "Vlotte verkoper".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_target_from_columns() {
        let id = Uuid::new_v4();
        let review = Review::try_from(model(None, Some(id))).unwrap();
        assert_eq!(review.target, ReviewTarget::Business(id));

        let cols = ReviewTargetColumns::from(ReviewTarget::Listing(id));
        assert_eq!(cols.listing_id, Some(id));
        assert_eq!(cols.business_id, None);
    }

    #[test]
    fn test_ambiguous_target_rejected() {
        assert!(Review::try_from(model(None, None)).is_err());
        assert!(Review::try_from(model(Some(Uuid::new_v4()), Some(Uuid::new_v4()))).is_err());
    }
}
