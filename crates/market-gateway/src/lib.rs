//! # market-gateway
//!
//! WebSocket gateway pushing chat events to buyers and sellers.
//!
//! Clients identify with their access token, subscribe to the conversations
//! they have open and receive every event published for them on Redis.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState, HeartbeatConfig};
