//! Domain entities - core marketplace objects

mod bid;
mod category;
mod conversation;
mod listing;
mod message;
mod profile;
mod review;

pub use bid::{Bid, BidWithBidder, UNKNOWN_BIDDER};
pub use category::{Category, Subcategory};
pub use conversation::{Conversation, ConversationRead};
pub use listing::{Listing, ListingPatch, ListingStatus};
pub use message::{
    public_object_url, Message, MessageAttachment, NewAttachment, NormalizedAttachment,
};
pub use profile::{Profile, ANONYMOUS_REVIEWER, UNKNOWN_NAME};
pub use review::{Review, ReviewTarget, ReviewWithAuthor};
