//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in market-core.
//! Each repository handles database operations for a specific domain entity.

mod attachment;
mod bid;
mod category;
mod conversation;
mod conversation_read;
mod error;
mod favorite;
mod listing;
mod listing_view;
mod message;
mod profile;
mod review;

pub use attachment::PgAttachmentRepository;
pub use bid::PgBidRepository;
pub use category::PgCategoryRepository;
pub use conversation::PgConversationRepository;
pub use conversation_read::PgConversationReadRepository;
pub use favorite::PgFavoriteRepository;
pub use listing::PgListingRepository;
pub use listing_view::PgListingViewRepository;
pub use message::PgMessageRepository;
pub use profile::PgProfileRepository;
pub use review::PgReviewRepository;
