//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs; `market-db` provides the
//! PostgreSQL implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    Bid, BidWithBidder, Category, Conversation, ConversationRead, Listing, ListingStatus, Message,
    MessageAttachment, NewAttachment, Profile, Review, ReviewTarget, ReviewWithAuthor, Subcategory,
};
use crate::error::DomainError;
use crate::value_objects::{DockManager, PageRequest, SearchSort, ThreadMessage, Usage, Viewer};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Profile Repository
// ============================================================================

/// Filter for business directory candidates
#[derive(Debug, Clone, Default)]
pub struct BusinessProfileQuery {
    /// ILIKE pattern matched against company_name or shop_name
    pub name_pattern: Option<String>,
    /// Restrict to these profile ids
    pub ids: Option<Vec<Uuid>>,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Profile>>;

    /// Find several profiles at once
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<Profile>>;

    /// Profiles flagged as business or carrying a plan
    async fn find_businesses(&self, query: &BusinessProfileQuery) -> RepoResult<Vec<Profile>>;

    /// Store the payment processor account id
    async fn set_payment_account(&self, id: Uuid, account_id: &str) -> RepoResult<()>;

    /// Current usage of plan-limited resources
    async fn usage(&self, id: Uuid) -> RepoResult<Usage>;
}

// ============================================================================
// Listing Repository
// ============================================================================

/// Category browse query (`/listings`)
#[derive(Debug, Clone)]
pub struct ListingBrowseQuery {
    /// Raw text matched against title and description
    pub q: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub sort: SearchSort,
    pub page: PageRequest,
    pub with_count: bool,
}

/// Which sellers a search includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SellerFilter {
    #[default]
    Any,
    BusinessOnly,
    ExcludeBusiness,
}

/// Full-text-ish search query (`/search`)
#[derive(Debug, Clone, Default)]
pub struct ListingSearchQuery {
    /// Any term may match title or description
    pub terms: Vec<String>,
    /// Contained in the listing's categories (or equal to its category/subcategory id)
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub state: Option<String>,
    pub location: Option<String>,
    pub sellers: SellerFilter,
    /// `None` means every status
    pub status: Option<ListingStatus>,
    pub sort: SearchSort,
    pub page: PageRequest,
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Find listing by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Listing>>;

    /// Create a new listing
    async fn create(&self, listing: &Listing) -> RepoResult<()>;

    /// Persist every mutable field of a listing
    async fn update(&self, listing: &Listing) -> RepoResult<()>;

    /// Hard delete a listing
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Active listings for a category page; total only when requested
    async fn browse(&self, query: &ListingBrowseQuery) -> RepoResult<(Vec<Listing>, Option<i64>)>;

    /// Filtered search with exact total
    async fn search(&self, query: &ListingSearchQuery) -> RepoResult<(Vec<Listing>, i64)>;

    /// Titles of active listings matching any term
    async fn suggest_titles(&self, terms: &[String], limit: i64) -> RepoResult<Vec<String>>;

    /// Sellers with an active listing whose title matches the pattern
    async fn seller_ids_by_title(&self, pattern: &str) -> RepoResult<Vec<Uuid>>;

    /// A seller's newest active listings
    async fn active_by_seller(&self, seller_id: Uuid, limit: i64) -> RepoResult<Vec<Listing>>;
}

// ============================================================================
// Category Repository
// ============================================================================

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Active categories ordered by sort_order, then name
    async fn list_categories(&self) -> RepoResult<Vec<Category>>;

    /// All subcategories ordered by name
    async fn list_subcategories(&self) -> RepoResult<Vec<Subcategory>>;

    async fn find_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>>;

    async fn find_subcategory_by_slug(&self, slug: &str) -> RepoResult<Option<Subcategory>>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find conversation by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>>;

    /// Exact match on the sorted participant pair and listing
    async fn find_by_participants(
        &self,
        participants: [Uuid; 2],
        listing_id: Option<Uuid>,
    ) -> RepoResult<Option<Conversation>>;

    /// Create a new conversation
    async fn create(&self, conversation: &Conversation) -> RepoResult<()>;

    /// Conversations a user takes part in, most recently active first
    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Conversation>>;

    /// Bump `updated_at` to now
    async fn touch(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Backwards pagination through a conversation
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    /// Only messages created strictly before this instant
    pub before: Option<DateTime<Utc>>,
    pub limit: i64,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>>;

    /// Newest-first page of a conversation
    async fn find_by_conversation(
        &self,
        conversation_id: Uuid,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>>;

    /// Latest message of a conversation
    async fn last_in_conversation(&self, conversation_id: Uuid) -> RepoResult<Option<Message>>;

    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Replace the body and set `edited_at`
    async fn update_body(&self, id: Uuid, body: &str, edited_at: DateTime<Utc>) -> RepoResult<()>;

    /// Set `deleted_at`
    async fn soft_delete(&self, id: Uuid, deleted_at: DateTime<Utc>) -> RepoResult<()>;

    /// Messages sent by a user since the given instant
    async fn count_recent_by_sender(&self, sender_id: Uuid, since: DateTime<Utc>) -> RepoResult<i64>;

    /// Unread messages across all of a user's conversations
    async fn unread_total(&self, user_id: Uuid) -> RepoResult<i64>;

    /// Unread messages in one conversation
    async fn unread_in_conversation(&self, conversation_id: Uuid, user_id: Uuid) -> RepoResult<i64>;

    /// Oldest-first messages of every conversation the user takes part in
    async fn thread_messages_for(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<ThreadMessage>>;
}

// ============================================================================
// Attachment Repository
// ============================================================================

#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Store attachments for a message
    async fn create_many(
        &self,
        message_id: Uuid,
        attachments: &[NewAttachment],
    ) -> RepoResult<Vec<MessageAttachment>>;

    /// Attachments of several messages
    async fn find_by_messages(&self, message_ids: &[Uuid]) -> RepoResult<Vec<MessageAttachment>>;
}

// ============================================================================
// Conversation Read Repository
// ============================================================================

#[async_trait]
pub trait ConversationReadRepository: Send + Sync {
    /// Insert or move forward the read marker
    async fn upsert(&self, conversation_id: Uuid, user_id: Uuid, at: DateTime<Utc>) -> RepoResult<()>;

    async fn find(&self, conversation_id: Uuid, user_id: Uuid) -> RepoResult<Option<ConversationRead>>;
}

// ============================================================================
// Bid Repository
// ============================================================================

#[async_trait]
pub trait BidRepository: Send + Sync {
    /// Create a new bid
    async fn create(&self, bid: &Bid) -> RepoResult<()>;

    /// Bids on a listing, highest amount first
    async fn list_for_listing(&self, listing_id: Uuid) -> RepoResult<Vec<BidWithBidder>>;

    /// Highest amount and bid count
    async fn summary(&self, listing_id: Uuid) -> RepoResult<(Option<f64>, i64)>;
}

// ============================================================================
// Review Repository
// ============================================================================

/// Average rating of one business, computed from individual review rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    pub business_id: Uuid,
    pub average: f64,
    pub count: i64,
}

impl RatingAggregate {
    /// Fold `(business_id, rating)` rows into per-business averages
    pub fn from_rows(rows: &[(Uuid, i16)]) -> Vec<Self> {
        let mut sums: Vec<(Uuid, i64, i64)> = Vec::new();
        for (business_id, rating) in rows {
            match sums.iter_mut().find(|(id, _, _)| id == business_id) {
                Some(entry) => {
                    entry.1 += i64::from(*rating);
                    entry.2 += 1;
                }
                None => sums.push((*business_id, i64::from(*rating), 1)),
            }
        }
        sums.into_iter()
            .map(|(business_id, sum, count)| Self {
                business_id,
                average: sum as f64 / count as f64,
                count,
            })
            .collect()
    }
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review; a second review by the same author on the same target
    /// fails with `DomainError::ReviewAlreadyExists`
    async fn insert(&self, review: &Review) -> RepoResult<()>;

    /// Overwrite rating and comment of the author's existing review
    async fn update_existing(
        &self,
        target: ReviewTarget,
        author_id: Uuid,
        rating: i16,
        comment: &str,
    ) -> RepoResult<Option<Review>>;

    /// Review with its author's name and avatar
    async fn find_with_author(&self, id: Uuid) -> RepoResult<Option<ReviewWithAuthor>>;

    /// Newest reviews of a target
    async fn list_for_target(&self, target: ReviewTarget, limit: i64) -> RepoResult<Vec<ReviewWithAuthor>>;

    /// Raw `(business_id, rating)` rows for the given businesses
    async fn business_rating_rows(&self, business_ids: &[Uuid]) -> RepoResult<Vec<(Uuid, i16)>>;
}


// ============================================================================
// Dock Repository
// ============================================================================

/// Per-user chat dock layout; `market-cache` keeps it in Redis
#[async_trait]
pub trait DockRepository: Send + Sync {
    /// Stored layout, or an empty one
    async fn load(&self, user_id: Uuid) -> RepoResult<DockManager>;

    async fn save(&self, user_id: Uuid, manager: &DockManager) -> RepoResult<()>;
}

// ============================================================================
// Favorite Repository
// ============================================================================

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Idempotent
    async fn add(&self, user_id: Uuid, listing_id: Uuid) -> RepoResult<()>;

    async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> RepoResult<()>;

    async fn exists(&self, user_id: Uuid, listing_id: Uuid) -> RepoResult<bool>;

    async fn count_for_listing(&self, listing_id: Uuid) -> RepoResult<i64>;

    /// Favorited listings, most recently favorited first
    async fn listings_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Listing>>;
}

// ============================================================================
// Listing View Repository
// ============================================================================

#[async_trait]
pub trait ListingViewRepository: Send + Sync {
    /// Count the viewer once per listing and return the listing's view total
    async fn record(&self, listing_id: Uuid, viewer: &Viewer) -> RepoResult<i64>;

    /// View total, `None` when the listing does not exist
    async fn count(&self, listing_id: Uuid) -> RepoResult<Option<i64>>;
}
