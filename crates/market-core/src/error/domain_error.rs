//! Domain errors - error types for the domain layer
//!
//! Messages that reach end users are in Dutch, matching the storefront.

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Niet gevonden")]
    ListingNotFound(Uuid),

    /// Missing or owned by someone else; both look the same to the caller
    #[error("Niet gevonden of geen toegang")]
    ListingNotAccessible(Uuid),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Uuid),

    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Review not found")]
    ReviewNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Ongeldige status")]
    InvalidStatus(String),

    #[error("Rating 1-5")]
    InvalidRating(i64),

    #[error("Comment verplicht")]
    EmptyComment,

    #[error("listing_id of business_id verplicht")]
    MissingReviewTarget,

    #[error("listingId ontbreekt")]
    MissingListingId,

    #[error("Message must contain text or attachments")]
    EmptyMessage,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Leeg bestand")]
    EmptyFile,

    #[error("Bestand te groot (max {max_bytes} bytes)")]
    FileTooLarge { max_bytes: usize },

    #[error("Ongeldig bestandstype: {0}")]
    InvalidMimeType(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a participant of this conversation")]
    NotParticipant,

    #[error("Not the sender of this message")]
    NotMessageSender,

    #[error("Bieden niet toegestaan")]
    OffersNotAllowed,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Review already exists")]
    ReviewAlreadyExists,

    #[error("Conversation already exists")]
    ConversationAlreadyExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Maximum active listings limit reached. Upgrade your plan to create more listings.")]
    ListingLimitReached,

    #[error("Maximum active boosts limit reached. Upgrade your plan to create more boosts.")]
    BoostLimitReached,

    #[error("Je kan jezelf geen verzoek sturen.")]
    SelfRequest,

    #[error("Listing has no seller")]
    SellerMissing,

    #[error("Cannot bid on your own listing")]
    OwnListingBid,

    #[error("Cannot change a deleted message")]
    MessageDeleted,

    #[error("Too many messages, try again in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::ListingNotFound(_) | Self::ListingNotAccessible(_) => "UNKNOWN_LISTING",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",
            Self::ReviewNotFound => "UNKNOWN_REVIEW",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::InvalidRating(_) => "INVALID_RATING",
            Self::EmptyComment => "EMPTY_COMMENT",
            Self::MissingReviewTarget => "MISSING_REVIEW_TARGET",
            Self::MissingListingId => "MISSING_LISTING_ID",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::EmptyFile => "EMPTY_FILE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::InvalidMimeType(_) => "INVALID_MIME",

            // Authorization
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",
            Self::OffersNotAllowed => "OFFERS_NOT_ALLOWED",

            // Conflict
            Self::ReviewAlreadyExists => "REVIEW_ALREADY_EXISTS",
            Self::ConversationAlreadyExists => "CONVERSATION_ALREADY_EXISTS",

            // Business Rules
            Self::ListingLimitReached => "LISTING_LIMIT_REACHED",
            Self::BoostLimitReached => "BOOST_LIMIT_REACHED",
            Self::SelfRequest => "SELF_REQUEST",
            Self::SellerMissing => "SELLER_MISSING",
            Self::OwnListingBid => "OWN_LISTING_BID",
            Self::MessageDeleted => "MESSAGE_DELETED",
            Self::RateLimited { .. } => "RATE_LIMITED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound(_)
                | Self::ListingNotFound(_)
                | Self::ListingNotAccessible(_)
                | Self::ConversationNotFound(_)
                | Self::MessageNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::ReviewNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidStatus(_)
                | Self::InvalidRating(_)
                | Self::EmptyComment
                | Self::MissingReviewTarget
                | Self::MissingListingId
                | Self::EmptyMessage
                | Self::ContentTooLong { .. }
                | Self::InvalidAmount
                | Self::EmptyFile
                | Self::InvalidMimeType(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotParticipant | Self::NotMessageSender | Self::OffersNotAllowed
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ReviewAlreadyExists | Self::ConversationAlreadyExists
        )
    }

    /// Check if this is a business rule violation (rejected request, not a bug)
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::ListingLimitReached
                | Self::BoostLimitReached
                | Self::SelfRequest
                | Self::SellerMissing
                | Self::OwnListingBid
                | Self::MessageDeleted
        )
    }

    #[inline]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    #[inline]
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self, Self::FileTooLarge { .. })
    }
}
