//! # market-core
//!
//! Domain layer for the marketplace: entities, value objects, repository traits,
//! and domain events. Nothing here touches the database, Redis, or HTTP.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Bid, BidWithBidder, Category, Conversation, ConversationRead, Listing, ListingPatch,
    ListingStatus, Message, MessageAttachment, NewAttachment, NormalizedAttachment, Profile,
    Review, ReviewTarget, ReviewWithAuthor, Subcategory, UNKNOWN_BIDDER,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    AttachmentRepository, BidRepository, BusinessProfileQuery, CategoryRepository,
    ConversationReadRepository, ConversationRepository, DockRepository, FavoriteRepository,
    ListingBrowseQuery, ListingRepository, ListingSearchQuery, ListingViewRepository, MessageQuery,
    MessageRepository, ProfileRepository, RatingAggregate, RepoResult, ReviewRepository,
    SellerFilter,
};
pub use value_objects::{
    BillingCycle, BusinessSearchMode, BusinessSort, DockLayout, DockManager, EntitlementReport,
    Entitlements, KycStatus, LimitStatus, PageRequest, PlanType, ResponseTime, SearchSort,
    ShippingMode, SubscriptionData, ThreadMessage, Usage, Viewer,
};
