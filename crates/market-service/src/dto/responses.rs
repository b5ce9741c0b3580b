//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Field names follow
//! what the storefront already reads, which mixes snake_case and camelCase.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use market_core::entities::NormalizedAttachment;
use market_core::value_objects::{
    DockLayout, EntitlementLimits, Entitlements, PlanType, ResponseTime, ResponseTimeNote, Usage,
};

// ============================================================================
// Common Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// `{ "items": [...] }`
#[derive(Debug, Clone, Serialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

impl<T> ItemsResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

// ============================================================================
// Listing Responses
// ============================================================================

/// Listing as shown on a result card
#[derive(Debug, Clone, Serialize)]
pub struct ListingCard {
    pub id: Uuid,
    pub title: String,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub main_photo: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Only set by search
    #[serde(rename = "isBusinessSeller", skip_serializing_if = "Option::is_none")]
    pub is_business_seller: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BrowseMeta {
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    pub counted: bool,
}

/// `GET /listings` body
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub items: Vec<ListingCard>,
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<BrowseMeta>,
}

impl ListingPage {
    /// Unknown category or subcategory slug
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            limit,
            total: Some(0),
            meta: None,
        }
    }
}

/// Full listing
#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub allow_offers: bool,
    pub images: Vec<String>,
    pub main_photo: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub categories: Vec<i64>,
    pub is_business_seller: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Search Responses
// ============================================================================

/// Diagnostics returned with `debug=1`
#[derive(Debug, Clone, Serialize)]
pub struct SearchDebug {
    pub q: String,
    pub normalized: String,
    pub sort: String,
    pub business_only: bool,
    pub from: i64,
    pub to: i64,
    pub received: usize,
    pub empty_reason: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub items: Vec<ListingCard>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<SearchDebug>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

// ============================================================================
// Business Directory Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BusinessListingSummary {
    pub id: Uuid,
    pub title: String,
    pub price: Option<f64>,
    pub status: String,
}

/// One business card; carries both the resolved names and the raw columns
#[derive(Debug, Clone, Serialize)]
pub struct BusinessEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "shopName")]
    pub display_shop_name: String,
    pub categories: Vec<String>,
    pub city: String,
    pub rating: f64,
    pub reviews: i64,
    #[serde(rename = "subscriptionActive")]
    pub subscription_active: bool,
    #[serde(rename = "logoUrl")]
    pub logo_url: Option<String>,
    pub company_name: Option<String>,
    pub shop_name: Option<String>,
    pub full_name: Option<String>,
    pub listings: Vec<BusinessListingSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessDirectoryResponse {
    pub businesses: Vec<BusinessEntry>,
    pub cats: Vec<String>,
    pub cities: Vec<String>,
}

impl BusinessDirectoryResponse {
    pub fn empty() -> Self {
        Self {
            businesses: Vec::new(),
            cats: Vec::new(),
            cities: Vec::new(),
        }
    }
}

// ============================================================================
// Bid & Review Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BidResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub bidder_id: Uuid,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BidItem {
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub bidder_id: Uuid,
    pub bidder_name: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BidSummaryResponse {
    pub highest: Option<f64>,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem {
    pub id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub reviewer: String,
    pub reviewer_avatar: Option<String>,
}

/// Body returned after submitting a review
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedReview {
    pub id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub author_avatar: Option<String>,
    pub reviewer: String,
    pub reviewer_avatar: Option<String>,
}

// ============================================================================
// Profile, Entitlement & Category Responses
// ============================================================================

/// Public profile with name and city fallbacks applied
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub display_name: String,
    pub full_name: Option<String>,
    pub shop_name: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
    pub logo_url: Option<String>,
    pub is_business: bool,
    pub city: String,
    pub categories: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub subscription_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller's own profile; adds payment onboarding state
#[derive(Debug, Clone, Serialize)]
pub struct CurrentProfileResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub business_plan: Option<String>,
    pub has_payment_account: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitlementsResponse {
    pub plan: Option<PlanType>,
    pub entitlements: Entitlements,
    pub usage: Usage,
    pub limits: EntitlementLimits,
    pub can_create_listing: bool,
    pub can_create_boost: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub subcategories: Vec<SubcategoryResponse>,
}

// ============================================================================
// Chat Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub participants: [Uuid; 2],
    pub listing_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Inbox row
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: ConversationResponse,
    pub other: Option<ParticipantSummary>,
    pub last_message: Option<MessageResponse>,
    pub unread: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    /// Empty once deleted
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub attachments: Vec<NormalizedAttachment>,
    /// Own messages only: seen by the other participant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnreadResponse {
    pub unread: i64,
}

// ============================================================================
// Payment & KYC Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequestResponse {
    pub ok: bool,
    pub conversation_id: Uuid,
    pub shipping_mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OnboardResponse {
    #[serde(rename = "accountId")]
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KycAccountSnapshot {
    pub id: String,
    pub charges_enabled: bool,
    pub details_submitted: bool,
    pub requirements: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct KycStatusResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<KycAccountSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalAccountResponse {
    pub external_account: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct KycAccountResponse {
    pub account: KycAccountSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct KycFileResponse {
    pub file: Value,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VerificationResponse {
    pub verified: bool,
}

// ============================================================================
// Engagement Responses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IsFavoriteResponse {
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ViewResponse {
    pub success: bool,
    pub views: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ListingStatsResponse {
    pub views: i64,
    pub favorites: i64,
}

/// `averageMinutes` is null until at least one reply was measured
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResponseTimeResponse {
    #[serde(rename = "averageMinutes")]
    pub average_minutes: Option<i64>,
    pub samples: usize,
    pub note: ResponseTimeNote,
}

impl From<ResponseTime> for ResponseTimeResponse {
    fn from(rt: ResponseTime) -> Self {
        Self {
            average_minutes: rt.average_minutes,
            samples: rt.samples,
            note: rt.note,
        }
    }
}

// ============================================================================
// Dock Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DockResponse {
    pub docks: Vec<DockLayout>,
    pub bottom_offset: u32,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let label = |ok: bool| if ok { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if database_healthy && redis_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                redis: label(redis_healthy),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_card_keys() {
        let card = ListingCard {
            id: Uuid::nil(),
            title: "Racefiets".to_string(),
            price: Some(250.0),
            location: None,
            state: Some("gebruikt".to_string()),
            main_photo: None,
            images: vec![],
            created_at: Utc::now(),
            is_business_seller: Some(true),
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["isBusinessSeller"], true);
        assert!(json.get("location").is_none());
        assert!(json["main_photo"].is_null());
    }

    #[test]
    fn test_engagement_keys() {
        let json = serde_json::to_value(IsFavoriteResponse { is_favorite: true }).unwrap();
        assert_eq!(json["isFavorite"], true);

        let json = serde_json::to_value(ResponseTimeResponse::from(ResponseTime::empty())).unwrap();
        assert!(json["averageMinutes"].is_null());
        assert_eq!(json["samples"], 0);
        assert_eq!(json["note"], "empty");
    }

    #[test]
    fn test_empty_listing_page() {
        let json = serde_json::to_value(ListingPage::empty(2, 24)).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["page"], 2);
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_business_entry_names() {
        let entry = BusinessEntry {
            id: Uuid::nil(),
            name: "Fietsen Jan".to_string(),
            display_shop_name: "Fietsen Jan".to_string(),
            categories: vec![],
            city: "Gent".to_string(),
            rating: 4.5,
            reviews: 2,
            subscription_active: true,
            logo_url: None,
            company_name: Some("Fietsen Jan".to_string()),
            shop_name: None,
            full_name: None,
            listings: vec![],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["shopName"], "Fietsen Jan");
        assert!(json["shop_name"].is_null());
        assert_eq!(json["subscriptionActive"], true);
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true, true);
        assert_eq!(ready.status, "ready");
        assert_eq!(ready.checks.database, "healthy");

        let not_ready = ReadinessResponse::ready(true, false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.redis, "unhealthy");
    }
}
