//! Profile database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for profiles table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub shop_name: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
    pub business_logo_url: Option<String>,
    pub is_business: bool,
    pub business_plan: Option<String>,
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

/// Counts backing the entitlement report
#[derive(Debug, Clone, Copy, FromRow)]
pub struct UsageModel {
    pub active_listings: i64,
    pub active_boosts: i64,
    pub qr_credits_used_this_month: i64,
}
