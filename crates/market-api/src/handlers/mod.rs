//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod bids;
pub mod businesses;
pub mod categories;
pub mod conversations;
pub mod dock;
pub mod engagement;
pub mod favorites;
pub mod health;
pub mod kyc;
pub mod listings;
pub mod messages;
pub mod payments;
pub mod profiles;
pub mod reviews;
pub mod search;
