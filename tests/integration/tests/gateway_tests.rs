//! Gateway integration tests against live Redis fan-out
//!
//! Run with: cargo test -p integration-tests --test gateway_tests
//! Requires DATABASE_URL, REDIS_URL and JWT_SECRET.

use std::time::Duration;

use integration_tests::*;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

/// Redis SUBSCRIBE completes asynchronously after the gateway acknowledges
const SUBSCRIBE_SETTLE: Duration = Duration::from_millis(300);

async fn conversation_between(server: &TestServer, a: &TestUser, b: &TestUser) -> Conversation {
    assert_json(
        server
            .post_auth("/conversations", a, &json!({ "other_user_id": b.id }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_subscribed_member_receives_message() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let sender = server.create_user("Mila").await.unwrap();
    let receiver = server.create_user("Nand").await.unwrap();
    let conversation = conversation_between(&server, &sender, &receiver).await;

    let mut client = GatewayClient::identified(&server.gateway_url(), &receiver)
        .await
        .unwrap();
    let ack = client.subscribe(conversation.id).await.unwrap();
    assert_eq!(ack["t"], "SUBSCRIBED");
    assert_eq!(ack["d"]["conversation_id"], conversation.id.to_string());
    tokio::time::sleep(SUBSCRIBE_SETTLE).await;

    let sent: ChatMessage = assert_json(
        server
            .post_auth(
                &format!("/conversations/{}/messages", conversation.id),
                &sender,
                &json!({ "body": "Hoi, ophalen morgen?" }),
            )
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    let event = client.next_dispatch("MESSAGE_CREATED").await.unwrap();
    assert_eq!(event["d"]["message_id"], sent.id.to_string());
    assert_eq!(event["d"]["body"], "Hoi, ophalen morgen?");
    assert!(event["s"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_unsubscribed_participant_receives_via_user_channel() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let sender = server.create_user("Olivia").await.unwrap();
    let receiver = server.create_user("Pieter").await.unwrap();
    let conversation = conversation_between(&server, &sender, &receiver).await;

    let mut client = GatewayClient::identified(&server.gateway_url(), &receiver)
        .await
        .unwrap();
    tokio::time::sleep(SUBSCRIBE_SETTLE).await;

    let response = server
        .post_auth(
            &format!("/conversations/{}/messages", conversation.id),
            &sender,
            &json!({ "body": "Nog interesse?" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let event = client.next_dispatch("MESSAGE_CREATED").await.unwrap();
    assert_eq!(event["d"]["conversation_id"], conversation.id.to_string());
}

#[tokio::test]
async fn test_non_member_subscription_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let a = server.create_user("Quinten").await.unwrap();
    let b = server.create_user("Roos").await.unwrap();
    let outsider = server.create_user("Stan").await.unwrap();
    let conversation = conversation_between(&server, &a, &b).await;

    let mut client = GatewayClient::identified(&server.gateway_url(), &outsider)
        .await
        .unwrap();
    let frame = client.subscribe(conversation.id).await.unwrap();
    assert_eq!(frame["op"], 0);
    assert_eq!(frame["t"], "SUBSCRIPTION_REJECTED");

    // Session stays usable after a rejection
    client.send(1, json!(null)).await.unwrap();
    let ack = client.next_frame().await.unwrap();
    assert_eq!(ack["op"], 11);

    let unknown = client.subscribe(Uuid::new_v4()).await.unwrap();
    assert_eq!(unknown["t"], "SUBSCRIPTION_REJECTED");
}

#[tokio::test]
async fn test_mark_read_over_gateway() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let sender = server.create_user("Tess").await.unwrap();
    let reader = server.create_user("Utte").await.unwrap();
    let conversation = conversation_between(&server, &sender, &reader).await;

    let response = server
        .post_auth(
            &format!("/conversations/{}/messages", conversation.id),
            &sender,
            &json!({ "body": "Gezien?" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let mut client = GatewayClient::identified(&server.gateway_url(), &reader)
        .await
        .unwrap();
    for _ in 0..3 {
        client
            .send(5, json!({ "conversation_id": conversation.id }))
            .await
            .unwrap();
    }

    let mut unread = i64::MAX;
    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let body: Unread = assert_json(
            server.get_auth("/messages/unread", &reader).await.unwrap(),
            StatusCode::OK,
        )
        .await
        .unwrap();
        unread = body.unread;
        if unread == 0 {
            break;
        }
    }
    assert_eq!(unread, 0);
}
