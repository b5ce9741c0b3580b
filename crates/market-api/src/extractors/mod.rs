//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and loosely typed
//! query strings.

mod auth;
mod client_ip;
mod path;
mod query;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use client_ip::ClientIp;
pub use path::IdPath;
pub use query::LooseQuery;
pub use validated::{JsonBody, ValidatedJson};
