//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and implements one
//! area of the marketplace: listings, search, the business directory, chat,
//! bids, reviews, favorites, engagement stats, payments and the chat dock.

pub mod bid;
pub mod business;
pub mod category;
pub mod context;
pub mod conversation;
pub mod dock;
pub mod engagement;
pub mod entitlement;
pub mod error;
pub mod favorite;
pub mod kyc;
pub mod listing;
pub mod message;
pub mod payment_request;
pub mod profile;
pub mod read;
pub mod review;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all services for convenience
pub use bid::BidService;
pub use business::BusinessDirectoryService;
pub use category::CategoryService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use conversation::ConversationService;
pub use dock::DockService;
pub use engagement::EngagementService;
pub use entitlement::EntitlementService;
pub use error::{ServiceError, ServiceResult};
pub use favorite::FavoriteService;
pub use kyc::KycService;
pub use listing::ListingService;
pub use message::MessageService;
pub use payment_request::PaymentRequestService;
pub use profile::ProfileService;
pub use read::ReadService;
pub use review::ReviewService;
pub use search::SearchService;
