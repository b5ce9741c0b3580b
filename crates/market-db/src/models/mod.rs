//! Database models - SQLx-compatible structs for PostgreSQL tables

mod bid;
mod category;
mod conversation;
mod listing;
mod message;
mod profile;
mod review;

pub use bid::BidWithBidderModel;
pub use category::{CategoryModel, SubcategoryModel};
pub use conversation::{ConversationModel, ConversationReadModel};
pub use listing::ListingModel;
pub use message::{AttachmentModel, MessageModel, ThreadMessageModel};
pub use profile::{ProfileModel, UsageModel};
pub use review::{RatingRowModel, ReviewModel, ReviewWithAuthorModel};
