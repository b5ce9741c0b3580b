//! Query string extractor

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::response::ApiError;

/// Query parameters; most fields are kept as raw strings and parsed leniently
/// by the services, so only structural errors reject the request
#[derive(Debug, Clone, Default)]
pub struct LooseQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for LooseQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(inner) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(LooseQuery(inner))
    }
}
