//! Gateway error types

use crate::protocol::CloseCode;
use market_cache::SubscriberError;
use market_service::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(&'static str),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Subscriber error: {0}")]
    Subscriber(#[from] SubscriberError),

    /// The writer task is gone
    #[error("Connection closed")]
    ConnectionClosed,
}

impl GatewayError {
    /// Close code sent to the client when a handler fails
    #[must_use]
    pub const fn close_code(&self) -> CloseCode {
        match self {
            Self::InvalidPayload(_) => CloseCode::DecodeError,
            Self::AuthenticationFailed(_) => CloseCode::AuthenticationFailed,
            Self::NotAuthenticated => CloseCode::NotAuthenticated,
            Self::Service(_) | Self::Subscriber(_) | Self::ConnectionClosed => CloseCode::UnknownError,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
