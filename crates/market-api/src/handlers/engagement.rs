//! Listing views, listing stats and seller response time

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{headers::Cookie, TypedHeader};
use market_core::value_objects::Viewer;
use market_service::dto::{ListingStatsResponse, ResponseTimeResponse};
use market_service::EngagementService;
use uuid::Uuid;

use crate::extractors::{IdPath, OptionalAuthUser};
use crate::response::{ApiResult, NoStore};
use crate::state::AppState;

/// Cookie identifying an anonymous visitor
pub const SESSION_COOKIE: &str = "session";

const SESSION_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Longer values are ignored and replaced with a fresh session
const MAX_SESSION_LEN: usize = 64;

/// Signed-in users count by id, anonymous visitors by session cookie.
/// Returns the session to set when the visitor had none.
fn viewer_for(user_id: Option<Uuid>, session: Option<&str>) -> (Viewer, Option<String>) {
    if let Some(user_id) = user_id {
        return (Viewer::User(user_id), None);
    }
    match session.filter(|s| !s.is_empty() && s.len() <= MAX_SESSION_LEN) {
        Some(session) => (Viewer::Session(session.to_string()), None),
        None => {
            let session = Uuid::new_v4().to_string();
            (Viewer::Session(session.clone()), Some(session))
        }
    }
}

/// Count a view of a listing
///
/// POST /listings/{listing_id}/view
pub async fn record_view(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(listing_id): IdPath<Uuid>,
    cookies: Option<TypedHeader<Cookie>>,
) -> ApiResult<Response> {
    let session = cookies.as_ref().and_then(|TypedHeader(c)| c.get(SESSION_COOKIE));
    let (viewer, new_session) = viewer_for(auth.user_id(), session);

    let body = EngagementService::new(state.service_context())
        .record_view(listing_id, &viewer)
        .await?;

    let mut response = Json(body).into_response();
    if let Some(session) = new_session {
        let cookie = format!(
            "{SESSION_COOKIE}={session}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; HttpOnly; SameSite=Lax"
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    Ok(response)
}

/// GET /listings/{listing_id}/stats
pub async fn stats(
    State(state): State<AppState>,
    IdPath(listing_id): IdPath<Uuid>,
) -> ApiResult<NoStore<ListingStatsResponse>> {
    let stats = EngagementService::new(state.service_context())
        .stats(listing_id)
        .await?;
    Ok(NoStore(stats))
}

/// Average minutes until a seller first replies
///
/// GET /sellers/{seller_id}/response-time
pub async fn response_time(
    State(state): State<AppState>,
    IdPath(seller_id): IdPath<Uuid>,
) -> ApiResult<NoStore<ResponseTimeResponse>> {
    let response = EngagementService::new(state.service_context())
        .response_time(seller_id)
        .await?;
    Ok(NoStore(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_prefers_user() {
        let user = Uuid::new_v4();
        let (viewer, new_session) = viewer_for(Some(user), Some("abc"));
        assert_eq!(viewer, Viewer::User(user));
        assert!(new_session.is_none());
    }

    #[test]
    fn test_viewer_reuses_or_issues_session() {
        let (viewer, new_session) = viewer_for(None, Some("abc"));
        assert_eq!(viewer, Viewer::Session("abc".to_string()));
        assert!(new_session.is_none());

        let (viewer, new_session) = viewer_for(None, None);
        let issued = new_session.unwrap();
        assert_eq!(viewer, Viewer::Session(issued));

        let oversized = "x".repeat(MAX_SESSION_LEN + 1);
        let (_, new_session) = viewer_for(None, Some(&oversized));
        assert!(new_session.is_some());
    }
}
