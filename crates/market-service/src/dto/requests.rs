//! Request DTOs for API endpoints
//!
//! Bodies implement `Deserialize` and `Validate`. Query parameter structs keep
//! numbers and flags as strings: the storefront sends them loosely and an
//! unparsable value falls back to the default instead of failing the request.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use market_core::entities::NewAttachment;
use market_core::value_objects::ShippingMode;

/// Parse a loosely typed query number
pub fn parse_number<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// `"1"`/`"true"` flags
pub fn parse_flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("1" | "true"))
}

/// Trimmed, non-empty text
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Listing Requests
// ============================================================================

/// `GET /listings` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseListingsParams {
    pub q: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Subcategory slug
    pub sub: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    /// `"0"` skips the total count
    pub count: Option<String>,
}

/// Create listing request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 200, message = "Titel moet 1-200 tekens zijn"))]
    pub title: String,

    #[validate(length(max = 10000, message = "Beschrijving is te lang"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Prijs mag niet negatief zijn"))]
    pub price: Option<f64>,

    pub location: Option<String>,

    /// Item condition
    pub state: Option<String>,

    #[serde(default)]
    pub allow_offers: bool,

    #[serde(default)]
    #[validate(length(max = 20, message = "Maximaal 20 foto's"))]
    pub images: Vec<String>,

    pub main_photo: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,

    /// Wire or stored status; defaults to active
    pub status: Option<String>,
}

/// Partial listing update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateListingRequest {
    #[validate(length(min = 1, max = 200, message = "Titel moet 1-200 tekens zijn"))]
    pub title: Option<String>,

    #[validate(length(max = 10000, message = "Beschrijving is te lang"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Prijs mag niet negatief zijn"))]
    pub price: Option<f64>,

    pub location: Option<String>,
    pub state: Option<String>,
    pub allow_offers: Option<bool>,

    #[validate(length(max = 20, message = "Maximaal 20 foto's"))]
    pub images: Option<Vec<String>>,

    pub main_photo: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub status: Option<String>,
}

// ============================================================================
// Search Requests
// ============================================================================

/// `GET /search` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(alias = "catId")]
    pub cat_id: Option<String>,
    #[serde(alias = "subId")]
    pub sub_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(alias = "priceMin")]
    pub price_min: Option<String>,
    #[serde(alias = "priceMax")]
    pub price_max: Option<String>,
    pub state: Option<String>,
    pub location: Option<String>,
    pub sort: Option<String>,
    /// `"0"` excludes business sellers
    pub business: Option<String>,
    #[serde(alias = "businessOnly")]
    pub business_only: Option<String>,
    pub debug: Option<String>,
    #[serde(alias = "showAll")]
    pub show_all: Option<String>,
    /// `simple` skips synonym expansion and filters
    pub mode: Option<String>,
}

/// `GET /search/suggest` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

/// `POST /kyc/file` query; the document itself is the raw request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KycFileParams {
    pub filename: Option<String>,
}

/// `GET /businesses` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessParams {
    pub q: Option<String>,
    pub mode: Option<String>,
    pub cat: Option<String>,
    pub subcat: Option<String>,
    pub city: Option<String>,
    #[serde(alias = "minRating")]
    pub min_rating: Option<String>,
    pub sort: Option<String>,
}

// ============================================================================
// Bid & Review Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBidRequest {
    pub amount: f64,
}

/// `GET /reviews` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewListParams {
    pub listing_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
}

/// Rating and comment are checked by the service so the Dutch messages
/// match the storefront
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub listing_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

// ============================================================================
// Chat Requests
// ============================================================================

/// Start (or reopen) a conversation
#[derive(Debug, Clone, Deserialize)]
pub struct StartConversationRequest {
    #[serde(alias = "otherUserId")]
    pub other_user_id: Uuid,
    #[serde(default, alias = "listingId")]
    pub listing_id: Option<Uuid>,
}

/// `GET /conversations/:id/messages` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageListParams {
    /// Only messages created strictly before this instant
    pub before: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[serde(default, alias = "text")]
    #[validate(length(max = 4000, message = "Bericht is te lang (max 4000 tekens)"))]
    pub body: String,

    #[serde(default)]
    #[validate(length(max = 10, message = "Maximaal 10 bijlagen"))]
    pub attachments: Vec<NewAttachment>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditMessageRequest {
    #[serde(alias = "text")]
    #[validate(length(min = 1, max = 4000, message = "Bericht moet 1-4000 tekens zijn"))]
    pub body: String,
}

// ============================================================================
// Payment & KYC Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingChoice {
    #[serde(default)]
    pub mode: ShippingMode,
}

/// `POST /payments/request`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentRequestBody {
    #[serde(default, alias = "listingId")]
    pub listing_id: Option<Uuid>,
    #[serde(default)]
    pub shipping: Option<ShippingChoice>,
}

/// Seller onboarding form; blocks follow the processor's account shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KycOnboardRequest {
    pub email: Option<String>,
    pub business_type: Option<String>,
    pub business_profile: Option<Value>,
    pub individual: Option<Value>,
    pub company: Option<Value>,
    pub tos_acceptance: Option<Value>,
    /// `{ "token": "btok_..." }`
    pub external_account: Option<Value>,
}

impl KycOnboardRequest {
    /// Bank token from `external_account.token`
    pub fn bank_token(&self) -> Option<&str> {
        self.external_account
            .as_ref()
            .and_then(|ext| ext.get("token"))
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalAccountRequest {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    #[serde(rename = "bankToken")]
    pub bank_token: Option<String>,
}

// ============================================================================
// Dock Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct OpenDockRequest {
    #[serde(alias = "conversationId")]
    pub conversation_id: Uuid,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinimizeDockRequest {
    pub minimized: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DockWidthRequest {
    #[validate(range(min = 1, max = 4000, message = "Ongeldige breedte"))]
    pub width: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockOffsetRequest {
    pub offset: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loose_query_values() {
        assert_eq!(parse_number::<i64>(Some(" 3 ")), Some(3));
        assert_eq!(parse_number::<i64>(Some("abc")), None);
        assert_eq!(parse_number::<f64>(Some("12.5")), Some(12.5));
        assert!(parse_flag(Some("1")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(None));
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" fiets ")), Some("fiets".to_string()));
    }

    #[test]
    fn test_search_params_accept_camel_case() {
        let params: SearchParams =
            serde_json::from_value(json!({"catId": "4", "businessOnly": "1", "showAll": "1"})).unwrap();
        assert_eq!(params.cat_id.as_deref(), Some("4"));
        assert_eq!(params.business_only.as_deref(), Some("1"));
        assert_eq!(params.show_all.as_deref(), Some("1"));
    }

    #[test]
    fn test_payment_request_defaults_to_ship() {
        let body: PaymentRequestBody =
            serde_json::from_value(json!({"listingId": Uuid::nil(), "shipping": {}})).unwrap();
        assert_eq!(body.listing_id, Some(Uuid::nil()));
        assert_eq!(body.shipping.unwrap().mode, ShippingMode::Ship);

        let body: PaymentRequestBody =
            serde_json::from_value(json!({"shipping": {"mode": "pickup"}})).unwrap();
        assert!(body.listing_id.is_none());
        assert_eq!(body.shipping.unwrap().mode, ShippingMode::Pickup);
    }

    #[test]
    fn test_send_message_validation() {
        let req: SendMessageRequest = serde_json::from_value(json!({"text": "hoi"})).unwrap();
        assert_eq!(req.body, "hoi");
        assert!(req.validate().is_ok());

        let req = SendMessageRequest {
            body: "x".repeat(4001),
            attachments: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_kyc_bank_token() {
        let req: KycOnboardRequest =
            serde_json::from_value(json!({"external_account": {"token": "btok_1"}})).unwrap();
        assert_eq!(req.bank_token(), Some("btok_1"));

        let req: KycOnboardRequest =
            serde_json::from_value(json!({"external_account": {"iban": "BE00"}})).unwrap();
        assert_eq!(req.bank_token(), None);
    }
}
