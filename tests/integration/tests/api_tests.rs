//! REST API integration tests
//!
//! Run with: cargo test -p integration-tests --test api_tests
//! Requires DATABASE_URL, REDIS_URL and JWT_SECRET.

use integration_tests::*;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("server starts");
    let response = server.get_raw("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let ready = server.get_raw("/health/ready").await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_get_and_browse_listing() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let seller = server.create_user("Lotte").await.unwrap();

    let request = CreateListing::unique(120.0);
    let response = server.post_auth("/listings", &seller, &request).await.unwrap();
    let created: Listing = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created.seller_id, seller.id);
    assert_eq!(created.title, request.title);
    assert_eq!(created.main_photo.as_deref(), request.images.first().map(String::as_str));
    assert_eq!(created.status, "active");

    let fetched: Listing = assert_json(
        server.get(&format!("/listings/{}", created.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.price, Some(120.0));

    let browse = server
        .get(&format!("/listings?q={}&limit=10", request.title.replace(' ', "%20")))
        .await
        .unwrap();
    assert_eq!(browse.status(), StatusCode::OK);
    assert_eq!(browse.headers()["cache-control"], "no-store");
    assert!(browse.headers().contains_key("x-query-time"));
    let page: ListingPage = browse.json().await.unwrap();
    assert_eq!(page.limit, 10);
    assert!(page.items.iter().any(|card| card.id == created.id));
}

#[tokio::test]
async fn test_listing_errors() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let seller = server.create_user("Bram").await.unwrap();

    let anonymous = server.get("/listings/not-a-uuid").await.unwrap();
    let error: ErrorEnvelope = assert_json(anonymous, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!error.error.code.is_empty());

    let missing = server
        .get(&format!("/listings/{}", uuid::Uuid::new_v4()))
        .await
        .unwrap();
    assert_status(missing, StatusCode::NOT_FOUND).await.unwrap();

    let mut empty_title = CreateListing::unique(10.0);
    empty_title.title = String::new();
    let invalid = server.post_auth("/listings", &seller, &empty_title).await.unwrap();
    assert_status(invalid, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_update_and_delete_own_listing() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let seller = server.create_user("Elise").await.unwrap();
    let stranger = server.create_user("Wout").await.unwrap();

    let listing: Listing = assert_json(
        server
            .post_auth("/listings", &seller, &CreateListing::unique(90.0))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let path = format!("/listings/{}", listing.id);

    let updated: Listing = assert_json(
        server
            .put_auth(&path, &seller, &json!({ "price": 75.0, "status": "paused" }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(updated.price, Some(75.0));
    assert_eq!(updated.status, "paused");

    let invalid = server
        .put_auth(&path, &seller, &json!({ "status": "weg" }))
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(invalid, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.message, "Ongeldige status");

    let foreign = server
        .put_auth(&path, &stranger, &json!({ "price": 1.0 }))
        .await
        .unwrap();
    assert_status(foreign, StatusCode::NOT_FOUND).await.unwrap();

    let foreign_delete = server.delete_auth(&path, &stranger).await.unwrap();
    assert_status(foreign_delete, StatusCode::NOT_FOUND).await.unwrap();

    let deleted = server.delete_auth(&path, &seller).await.unwrap();
    assert_status(deleted, StatusCode::OK).await.unwrap();
    assert_status(server.get(&path).await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_listing_requires_auth() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server
        .client
        .post(format!("{}/api/v1/listings", server.base_url()))
        .json(&CreateListing::unique(10.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bids_and_summary() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let seller = server.create_user("Ines").await.unwrap();
    let bidder = server.create_user("Jonas").await.unwrap();

    let listing: Listing = assert_json(
        server
            .post_auth("/listings", &seller, &CreateListing::unique(200.0))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let bids_path = format!("/listings/{}/bids", listing.id);

    for amount in [150.0, 175.0] {
        let response = server
            .post_auth(&bids_path, &bidder, &json!({ "amount": amount }))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let own = server
        .post_auth(&bids_path, &seller, &json!({ "amount": 190.0 }))
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(own, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "OWN_LISTING_BID");

    let summary: BidSummary = assert_json(
        server.get(&format!("{bids_path}/summary")).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(summary.highest, Some(175.0));
    assert_eq!(summary.count, 2);
}

#[tokio::test]
async fn test_conversation_messages_and_unread() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let seller = server.create_user("Noor").await.unwrap();
    let buyer = server.create_user("Daan").await.unwrap();

    let listing: Listing = assert_json(
        server
            .post_auth("/listings", &seller, &CreateListing::unique(35.0))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    let start = json!({ "other_user_id": seller.id, "listing_id": listing.id });
    let conversation: Conversation = assert_json(
        server.post_auth("/conversations", &buyer, &start).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(conversation.participants.contains(&buyer.id));
    assert!(conversation.participants.contains(&seller.id));
    assert_eq!(conversation.listing_id, Some(listing.id));

    let reopened: Conversation = assert_json(
        server.post_auth("/conversations", &buyer, &start).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(reopened.id, conversation.id);

    let messages_path = format!("/conversations/{}/messages", conversation.id);
    let sent: ChatMessage = assert_json(
        server
            .post_auth(&messages_path, &buyer, &json!({ "body": "Is hij nog te koop?" }))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(sent.sender_id, buyer.id);
    assert_eq!(sent.conversation_id, conversation.id);

    let unread: Unread = assert_json(
        server.get_auth("/messages/unread", &seller).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(unread.unread >= 1);

    let read = server
        .post_auth(&format!("/conversations/{}/read", conversation.id), &seller, &json!({}))
        .await
        .unwrap();
    assert_status(read, StatusCode::OK).await.unwrap();

    let unread: Unread = assert_json(
        server.get_auth("/messages/unread", &seller).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(unread.unread, 0);

    let edited: ChatMessage = assert_json(
        server
            .patch_auth(&format!("/messages/{}", sent.id), &buyer, &json!({ "body": "Nog te koop?" }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(edited.body, "Nog te koop?");
    assert!(edited.edited_at.is_some());

    let foreign = server
        .patch_auth(&format!("/messages/{}", sent.id), &seller, &json!({ "body": "gekaapt" }))
        .await
        .unwrap();
    assert!(foreign.status().is_client_error());

    let deleted = server
        .delete_auth(&format!("/messages/{}", sent.id), &buyer)
        .await
        .unwrap();
    assert_status(deleted, StatusCode::OK).await.unwrap();

    let history: Vec<ChatMessage> = assert_json(
        server.get_auth(&messages_path, &seller).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].deleted_at.is_some());
    assert!(history[0].body.is_empty());
}

#[tokio::test]
async fn test_outsider_cannot_read_conversation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let a = server.create_user("Fien").await.unwrap();
    let b = server.create_user("Gust").await.unwrap();
    let outsider = server.create_user("Hanne").await.unwrap();

    let conversation: Conversation = assert_json(
        server
            .post_auth("/conversations", &a, &json!({ "other_user_id": b.id }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    let response = server
        .get_auth(&format!("/conversations/{}/messages", conversation.id), &outsider)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_payment_request() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let seller = server.create_user("Kato").await.unwrap();
    let buyer = server.create_user("Lars").await.unwrap();

    let listing: Listing = assert_json(
        server
            .post_auth("/listings", &seller, &CreateListing::unique(60.0))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    let missing = server
        .post_auth("/payments/request", &buyer, &json!({}))
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(missing, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "MISSING_LISTING_ID");

    let own = server
        .post_auth("/payments/request", &seller, &json!({ "listing_id": listing.id }))
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(own, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.message, "Je kan jezelf geen verzoek sturen.");

    let requested: PaymentRequested = assert_json(
        server
            .post_auth(
                "/payments/request",
                &buyer,
                &json!({ "listing_id": listing.id, "shipping": { "mode": "ship" } }),
            )
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(requested.ok);
    assert_eq!(requested.shipping_mode, "ship");

    let history: Vec<ChatMessage> = assert_json(
        server
            .get_auth(&format!("/conversations/{}/messages", requested.conversation_id), &seller)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sender_id, buyer.id);
}

#[tokio::test]
async fn test_favorites_views_and_stats() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let seller = server.create_user("Wout").await.unwrap();
    let fan = server.create_user("Fien").await.unwrap();

    let listing: Listing = assert_json(
        server
            .post_auth("/listings", &seller, &CreateListing::unique(60.0))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let base = format!("/listings/{}", listing.id);

    for _ in 0..2 {
        let response = server
            .post_auth(&format!("{base}/favorite"), &fan, &json!({}))
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }
    let flag: serde_json::Value = assert_json(
        server.get_auth(&format!("{base}/is-favorite"), &fan).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(flag["isFavorite"], true);

    let anonymous: serde_json::Value =
        assert_json(server.get(&format!("{base}/is-favorite")).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(anonymous["isFavorite"], false);

    let saved: serde_json::Value =
        assert_json(server.get_auth("/favorites", &fan).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(saved["items"][0]["id"], listing.id.to_string());

    // A new visitor gets a session cookie; replaying it does not count twice
    let first = server.post_anonymous(&format!("{base}/view"), None).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let cookie = first.headers()["set-cookie"]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));
    let body: serde_json::Value = first.json().await.unwrap();
    assert_eq!(body["views"], 1);

    let again = server
        .post_anonymous(&format!("{base}/view"), Some(&cookie))
        .await
        .unwrap();
    assert!(!again.headers().contains_key("set-cookie"));
    let body: serde_json::Value = again.json().await.unwrap();
    assert_eq!(body["views"], 1);

    let by_user: serde_json::Value = assert_json(
        server.post_auth(&format!("{base}/view"), &fan, &json!({})).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(by_user["views"], 2);

    let stats: serde_json::Value =
        assert_json(server.get(&format!("{base}/stats")).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(stats["views"], 2);
    assert_eq!(stats["favorites"], 1);

    let response = server
        .post_auth(&format!("{base}/unfavorite"), &fan, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let missing: serde_json::Value = assert_json(
        server
            .get(&format!("/listings/{}/stats", uuid::Uuid::new_v4()))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(missing["views"], 0);
}

#[tokio::test]
async fn test_seller_response_time() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let seller = server.create_user("Ruben").await.unwrap();

    let empty: serde_json::Value = assert_json(
        server
            .get(&format!("/sellers/{}/response-time", seller.id))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(empty["averageMinutes"].is_null());
    assert_eq!(empty["samples"], 0);
    assert_eq!(empty["note"], "empty");
}

