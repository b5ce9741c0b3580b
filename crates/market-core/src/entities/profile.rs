//! Profile entity - a marketplace user, optionally acting as a business seller
//!
//! Profile rows have drifted over time: the same concept can live in several
//! columns (`company_name` vs `shop_name`, `city` vs `address.city`). The
//! accessors here resolve those fallbacks in one place.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::value_objects::SubscriptionData;

/// Name shown when a profile has no usable name at all
pub const UNKNOWN_NAME: &str = "Onbekend";

/// Name shown for reviewers without a full name
pub const ANONYMOUS_REVIEWER: &str = "Gebruiker";

/// Profile entity
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub shop_name: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
    pub business_logo_url: Option<String>,
    pub is_business: bool,
    pub business_plan: Option<String>,
    /// Free-form business settings (plan, billing_cycle, subscription_active, ...)
    pub business: Value,
    pub categories: Vec<String>,
    pub city: Option<String>,
    pub address: Value,
    pub invoice_address: Value,
    pub rating: Option<f64>,
    pub avg_rating: Option<f64>,
    pub review_count: Option<i64>,
    pub stripe_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// First non-blank value among the candidates
fn pick<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|v| !v.trim().is_empty())
}

/// Read a non-blank string field out of a JSON object
fn json_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

impl Profile {
    /// Create a new personal profile
    pub fn new(id: Uuid, full_name: Option<String>) -> Self {
        Self {
            id,
            full_name,
            shop_name: None,
            company_name: None,
            avatar_url: None,
            business_logo_url: None,
            is_business: false,
            business_plan: None,
            business: Value::Null,
            categories: Vec::new(),
            city: None,
            address: Value::Null,
            invoice_address: Value::Null,
            rating: None,
            avg_rating: None,
            review_count: None,
            stripe_account_id: None,
            created_at: Utc::now(),
        }
    }

    /// Business-facing name: company, then shop, then personal name
    pub fn display_name(&self) -> &str {
        pick(&[
            self.company_name.as_deref(),
            self.shop_name.as_deref(),
            self.full_name.as_deref(),
        ])
        .unwrap_or(UNKNOWN_NAME)
    }

    /// Shop name: shop, then company, then personal name
    pub fn shop_name_or_fallback(&self) -> &str {
        pick(&[
            self.shop_name.as_deref(),
            self.company_name.as_deref(),
            self.full_name.as_deref(),
        ])
        .unwrap_or_else(|| self.display_name())
    }

    /// Name used when this profile authored a review or a bid
    pub fn reviewer_name(&self) -> &str {
        pick(&[self.full_name.as_deref()]).unwrap_or(ANONYMOUS_REVIEWER)
    }

    /// City from the profile, then the address, then the invoice address
    pub fn resolved_city(&self) -> &str {
        pick(&[
            self.city.as_deref(),
            json_str(&self.address, "city"),
            json_str(&self.invoice_address, "city"),
        ])
        .unwrap_or("")
    }

    /// Logo for directory cards
    pub fn logo_url(&self) -> Option<&str> {
        pick(&[
            self.business_logo_url.as_deref(),
            self.avatar_url.as_deref(),
        ])
    }

    /// Stored rating, falling back to the legacy average column
    pub fn stored_rating(&self) -> f64 {
        self.rating.or(self.avg_rating).unwrap_or(0.0)
    }

    /// Whether this profile belongs in the business directory
    #[inline]
    pub fn is_business_profile(&self) -> bool {
        self.is_business
            || self
                .business_plan
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty())
    }

    /// Resolved subscription, if any
    pub fn subscription(&self) -> Option<SubscriptionData> {
        SubscriptionData::resolve(&self.business, self.business_plan.as_deref())
    }

    /// Whether the business has a paid subscription running
    pub fn subscription_active(&self) -> bool {
        let plan = self
            .business_plan
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        if plan == "pro" || plan == "premium" {
            return true;
        }
        if self
            .business
            .get("subscription_active")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            return true;
        }
        self.subscription().is_some_and(|s| s.subscription_active)
    }

    /// Whether the seller has a payment processor account
    #[inline]
    pub fn has_payment_account(&self) -> bool {
        self.stripe_account_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}
