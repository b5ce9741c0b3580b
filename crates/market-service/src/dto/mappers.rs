//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chrono::{DateTime, Utc};

use market_core::entities::{
    Bid, BidWithBidder, Category, Conversation, Listing, Message, NormalizedAttachment, Profile,
    ReviewWithAuthor, Subcategory,
};
use market_core::value_objects::DockManager;

use crate::payments::ProcessorAccount;

use super::responses::{
    BidItem, BidResponse, BusinessListingSummary, CategoryResponse, ConversationResponse,
    DockResponse, KycAccountSnapshot, ListingCard, ListingResponse, MessageResponse,
    ParticipantSummary, ProfileResponse, ReviewItem, SubcategoryResponse, SubmittedReview,
};

// ============================================================================
// Listing Mappers
// ============================================================================

impl From<&Listing> for ListingCard {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            price: listing.price,
            location: listing.location.clone(),
            state: listing.state.clone(),
            main_photo: listing.cover_photo().map(str::to_string),
            images: listing.images.clone(),
            created_at: listing.created_at,
            is_business_seller: None,
        }
    }
}

impl ListingCard {
    /// Card with the business seller flag, as search returns it
    pub fn with_seller_flag(listing: &Listing) -> Self {
        Self {
            is_business_seller: Some(listing.is_business_seller),
            ..Self::from(listing)
        }
    }
}

impl From<&Listing> for ListingResponse {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            seller_id: listing.seller_id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            location: listing.location.clone(),
            state: listing.state.clone(),
            allow_offers: listing.allow_offers,
            images: listing.images.clone(),
            main_photo: listing.main_photo.clone(),
            category_id: listing.category_id,
            subcategory_id: listing.subcategory_id,
            categories: listing.categories.clone(),
            is_business_seller: listing.is_business_seller,
            status: listing.status.as_str().to_string(),
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self::from(&listing)
    }
}

impl From<&Listing> for BusinessListingSummary {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            price: listing.price,
            status: listing.status.as_str().to_string(),
        }
    }
}

// ============================================================================
// Profile Mappers
// ============================================================================

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            display_name: profile.display_name().to_string(),
            full_name: profile.full_name.clone(),
            shop_name: profile.shop_name.clone(),
            company_name: profile.company_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            logo_url: profile.logo_url().map(str::to_string),
            is_business: profile.is_business_profile(),
            city: profile.resolved_city().to_string(),
            categories: profile.categories.clone(),
            rating: profile.stored_rating(),
            review_count: profile.review_count.unwrap_or(0),
            subscription_active: profile.subscription_active(),
            created_at: profile.created_at,
        }
    }
}

impl From<&Profile> for ParticipantSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.display_name().to_string(),
            avatar_url: profile.logo_url().map(str::to_string),
        }
    }
}

// ============================================================================
// Category Mappers
// ============================================================================

impl From<&Subcategory> for SubcategoryResponse {
    fn from(sub: &Subcategory) -> Self {
        Self {
            id: sub.id,
            name: sub.name.clone(),
            slug: sub.slug.clone(),
        }
    }
}

impl CategoryResponse {
    /// Category with the subcategories that belong to it
    pub fn with_subcategories(category: &Category, all: &[Subcategory]) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            sort_order: category.sort_order,
            subcategories: all
                .iter()
                .filter(|s| s.category_id == category.id)
                .map(SubcategoryResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Bid & Review Mappers
// ============================================================================

impl From<&Bid> for BidResponse {
    fn from(bid: &Bid) -> Self {
        Self {
            id: bid.id,
            listing_id: bid.listing_id,
            bidder_id: bid.bidder_id,
            amount: bid.amount,
            created_at: bid.created_at,
        }
    }
}

impl From<&BidWithBidder> for BidItem {
    fn from(row: &BidWithBidder) -> Self {
        Self {
            amount: row.bid.amount,
            created_at: row.bid.created_at,
            bidder_id: row.bid.bidder_id,
            bidder_name: row.bidder_name().to_string(),
        }
    }
}

impl From<&ReviewWithAuthor> for ReviewItem {
    fn from(row: &ReviewWithAuthor) -> Self {
        Self {
            id: row.review.id,
            rating: row.review.rating,
            comment: row.review.comment.clone(),
            created_at: row.review.created_at,
            reviewer: row.author_name().to_string(),
            reviewer_avatar: row.author_avatar.clone(),
        }
    }
}

impl From<&ReviewWithAuthor> for SubmittedReview {
    fn from(row: &ReviewWithAuthor) -> Self {
        let name = row.author_name().to_string();
        Self {
            id: row.review.id,
            rating: row.review.rating,
            comment: row.review.comment.clone(),
            date: row.review.created_at,
            created_at: row.review.created_at,
            author: name.clone(),
            author_avatar: row.author_avatar.clone(),
            reviewer: name,
            reviewer_avatar: row.author_avatar.clone(),
        }
    }
}

// ============================================================================
// Chat Mappers
// ============================================================================

impl From<&Conversation> for ConversationResponse {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id,
            participants: conversation.participants(),
            listing_id: conversation.listing_id,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

/// A message together with the data its response needs
#[derive(Debug, Clone)]
pub struct MessageWithDetails {
    pub message: Message,
    pub attachments: Vec<NormalizedAttachment>,
    /// Set for the viewer's own messages: the other participant's read marker
    pub other_last_read_at: Option<Option<DateTime<Utc>>>,
}

impl From<MessageWithDetails> for MessageResponse {
    fn from(details: MessageWithDetails) -> Self {
        let MessageWithDetails {
            message,
            attachments,
            other_last_read_at,
        } = details;

        let read = other_last_read_at.map(|at| message.is_read_by(at));
        let read_at = match (read, other_last_read_at) {
            (Some(true), Some(at)) => at,
            _ => None,
        };

        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            body: message.visible_body().to_string(),
            created_at: message.created_at,
            edited_at: message.edited_at,
            deleted_at: message.deleted_at,
            attachments: if message.is_deleted() { Vec::new() } else { attachments },
            read,
            read_at,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(MessageWithDetails {
            message,
            attachments: Vec::new(),
            other_last_read_at: None,
        })
    }
}

// ============================================================================
// KYC & Dock Mappers
// ============================================================================

impl From<&ProcessorAccount> for KycAccountSnapshot {
    fn from(account: &ProcessorAccount) -> Self {
        Self {
            id: account.id.clone(),
            charges_enabled: account.charges_enabled,
            details_submitted: account.details_submitted,
            requirements: account.requirements.clone(),
        }
    }
}

impl From<&DockManager> for DockResponse {
    fn from(manager: &DockManager) -> Self {
        Self {
            docks: manager.layout(),
            bottom_offset: manager.bottom_offset(),
        }
    }
}
