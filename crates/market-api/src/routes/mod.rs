//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{
    bids, businesses, categories, conversations, dock, engagement, favorites, health, kyc,
    listings, messages, payments, profiles, reviews, search,
};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(listing_routes())
        .merge(profile_routes())
        .merge(chat_routes())
        .merge(payment_routes())
        .merge(dock_routes())
}

/// Search, directory and reference data
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route("/search/suggest", get(search::suggest))
        .route("/businesses", get(businesses::list))
        .route("/categories", get(categories::list))
        .route("/reviews", get(reviews::list).post(reviews::submit))
}

/// Listing routes
fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/listings", get(listings::browse).post(listings::create))
        .route(
            "/listings/:listing_id",
            get(listings::get).put(listings::update).delete(listings::delete),
        )
        // Offers
        .route("/listings/:listing_id/bids", get(bids::list).post(bids::place))
        .route("/listings/:listing_id/bids/summary", get(bids::summary))
        // Favorites and engagement
        .route("/listings/:listing_id/favorite", post(favorites::favorite))
        .route("/listings/:listing_id/unfavorite", post(favorites::unfavorite))
        .route("/listings/:listing_id/is-favorite", get(favorites::is_favorite))
        .route("/listings/:listing_id/view", post(engagement::record_view))
        .route("/listings/:listing_id/stats", get(engagement::stats))
        .route("/favorites", get(favorites::list))
        .route("/sellers/:seller_id/response-time", get(engagement::response_time))
}

/// Profile routes
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles/me", get(profiles::me))
        .route("/profiles/me/entitlements", get(profiles::entitlements))
        .route("/profiles/:profile_id", get(profiles::get))
}

/// Conversation and message routes
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(conversations::list).post(conversations::start))
        .route("/conversations/:conversation_id", get(conversations::get))
        .route(
            "/conversations/:conversation_id/messages",
            get(messages::list).post(messages::send),
        )
        .route("/conversations/:conversation_id/read", post(conversations::mark_read))
        .route("/messages/unread", get(messages::unread))
        .route("/messages/:message_id", patch(messages::edit).delete(messages::delete))
}

/// Payment request and seller onboarding routes
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments/request", post(payments::request))
        .route("/kyc/onboard", post(kyc::onboard))
        .route("/kyc/status", get(kyc::status))
        .route("/kyc/verification", get(kyc::verification))
        .route(
            "/kyc/file",
            post(kyc::upload_file).layer(DefaultBodyLimit::max(kyc::KYC_FILE_BODY_LIMIT)),
        )
        .route("/kyc/external-account", post(kyc::external_account))
        .route("/kyc/account", patch(kyc::update_account))
}

/// Chat dock routes
fn dock_routes() -> Router<AppState> {
    Router::new()
        .route("/dock", get(dock::get))
        .route("/dock/open", post(dock::open))
        .route("/dock/offset", post(dock::offset))
        .route("/dock/close-all", post(dock::close_all))
        .route("/dock/:dock_id/close", post(dock::close))
        .route("/dock/:dock_id/minimize", post(dock::minimize))
        .route("/dock/:dock_id/width", post(dock::width))
}
