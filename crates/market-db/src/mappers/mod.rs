//! Entity to model mappers
//!
//! This module provides conversions between domain entities (market-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `TryFrom<Model>` where a row can violate an entity invariant
//! - `*Insert` structs: Prepare entity data for database operations

mod bid;
mod category;
mod conversation;
mod listing;
mod message;
mod profile;
mod review;

pub use listing::ListingInsert;
pub use review::ReviewTargetColumns;
