//! Access token validation
//!
//! Sign-in happens at the hosted identity provider; this service only checks
//! the HS256 tokens it issues.

mod jwt;

pub use jwt::{Claims, JwtService};
