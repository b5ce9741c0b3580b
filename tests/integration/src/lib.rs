//! Integration test utilities for the marketplace
//!
//! Spawns the REST API and the WebSocket gateway in-process against the
//! database and Redis named in the environment.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
