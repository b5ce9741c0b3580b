//! Repository traits

mod repositories;

pub use repositories::{
    AttachmentRepository, BidRepository, BusinessProfileQuery, CategoryRepository,
    ConversationReadRepository, ConversationRepository, DockRepository, FavoriteRepository,
    ListingBrowseQuery, ListingRepository, ListingSearchQuery, ListingViewRepository, MessageQuery,
    MessageRepository, ProfileRepository, RatingAggregate, RepoResult, ReviewRepository,
    SellerFilter,
};
