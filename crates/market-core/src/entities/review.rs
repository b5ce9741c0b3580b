//! Review entity - a rating left on a listing or on a business

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::ANONYMOUS_REVIEWER;

/// What a review is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ReviewTarget {
    Listing(Uuid),
    Business(Uuid),
}

impl ReviewTarget {
    pub fn listing_id(self) -> Option<Uuid> {
        match self {
            Self::Listing(id) => Some(id),
            Self::Business(_) => None,
        }
    }

    pub fn business_id(self) -> Option<Uuid> {
        match self {
            Self::Business(id) => Some(id),
            Self::Listing(_) => None,
        }
    }
}

/// Review entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: Uuid,
    pub target: ReviewTarget,
    pub author_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Review joined with its author's public profile fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithAuthor {
    pub review: Review,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
}

impl Review {
    pub const MIN_RATING: i16 = 1;
    pub const MAX_RATING: i16 = 5;

    pub fn new(id: Uuid, target: ReviewTarget, author_id: Uuid, rating: i16, comment: String) -> Self {
        Self {
            id,
            target,
            author_id,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_valid_rating(rating: i16) -> bool {
        (Self::MIN_RATING..=Self::MAX_RATING).contains(&rating)
    }
}

impl ReviewWithAuthor {
    pub fn author_name(&self) -> &str {
        self.author_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(ANONYMOUS_REVIEWER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(!Review::is_valid_rating(0));
        assert!(Review::is_valid_rating(1));
        assert!(Review::is_valid_rating(5));
        assert!(!Review::is_valid_rating(6));
    }

    #[test]
    fn test_target_ids() {
        let id = Uuid::new_v4();
        assert_eq!(ReviewTarget::Listing(id).listing_id(), Some(id));
        assert_eq!(ReviewTarget::Listing(id).business_id(), None);
        assert_eq!(ReviewTarget::Business(id).business_id(), Some(id));
    }

    #[test]
    fn test_author_name_fallback() {
        let review = Review::new(Uuid::new_v4(), ReviewTarget::Business(Uuid::new_v4()), Uuid::new_v4(), 4, "Top".into());
        let row = ReviewWithAuthor { review, author_name: Some(String::new()), author_avatar: None };
        assert_eq!(row.author_name(), "Gebruiker");
    }
}
