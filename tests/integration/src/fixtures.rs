//! Request bodies and response shapes used across the suites

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique suffix for titles so parallel tests do not collide
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Serialize)]
pub struct CreateListing {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub allow_offers: bool,
    pub images: Vec<String>,
}

impl CreateListing {
    pub fn unique(price: f64) -> Self {
        let suffix = unique_suffix();
        Self {
            title: format!("Stadsfiets {suffix} {}", &Uuid::new_v4().simple().to_string()[..8]),
            description: Some("Goed onderhouden, nieuwe banden".to_string()),
            price: Some(price),
            location: Some("Gent".to_string()),
            allow_offers: true,
            images: vec![format!("https://cdn.example/fiets-{suffix}.jpg")],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub price: Option<f64>,
    pub allow_offers: bool,
    pub main_photo: Option<String>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListingPage {
    pub items: Vec<ListingCard>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct ListingCard {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct BidSummary {
    pub highest: Option<f64>,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub participants: [Uuid; 2],
    pub listing_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub edited_at: Option<String>,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Unread {
    pub unread: i64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequested {
    pub ok: bool,
    pub conversation_id: Uuid,
    pub shipping_mode: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
