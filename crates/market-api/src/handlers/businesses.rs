//! Business directory handler

use axum::extract::State;
use market_service::dto::{BusinessDirectoryResponse, BusinessParams};
use market_service::BusinessDirectoryService;

use crate::extractors::LooseQuery;
use crate::response::{ApiResult, NoStore};
use crate::state::AppState;

/// Business directory with facets
///
/// GET /businesses
pub async fn list(
    State(state): State<AppState>,
    LooseQuery(params): LooseQuery<BusinessParams>,
) -> ApiResult<NoStore<BusinessDirectoryResponse>> {
    let response = BusinessDirectoryService::new(state.service_context())
        .list(params)
        .await?;
    Ok(NoStore(response))
}
