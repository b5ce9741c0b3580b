//! Caller address as reported by the reverse proxy

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// First hop of `X-Forwarded-For`, falling back to `X-Real-IP`
#[derive(Debug, Clone, Default)]
pub struct ClientIp(pub Option<String>);

impl ClientIp {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn from_headers(headers: &axum::http::HeaderMap) -> Option<String> {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .or_else(|| header("x-real-ip"))
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(Self::from_headers(&parts.headers)))
    }
}
