//! Search handlers

use axum::extract::State;
use market_service::dto::{SearchParams, SearchResponse, SuggestParams, SuggestResponse};
use market_service::SearchService;

use crate::extractors::LooseQuery;
use crate::response::{ApiResult, NoStore};
use crate::state::AppState;

/// Listing search with fallbacks
///
/// GET /search
pub async fn search(
    State(state): State<AppState>,
    LooseQuery(params): LooseQuery<SearchParams>,
) -> ApiResult<NoStore<SearchResponse>> {
    let response = SearchService::new(state.service_context()).search(params).await?;
    Ok(NoStore(response))
}

/// Title suggestions for the search box
///
/// GET /search/suggest
pub async fn suggest(
    State(state): State<AppState>,
    LooseQuery(params): LooseQuery<SuggestParams>,
) -> ApiResult<NoStore<SuggestResponse>> {
    let response = SearchService::new(state.service_context()).suggest(params).await?;
    Ok(NoStore(response))
}
