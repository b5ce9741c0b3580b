//! Seller entitlements and plan gating

use serde::{Deserialize, Serialize};

use super::subscription::PlanType;
use crate::error::DomainError;

/// What a seller's plan allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlements {
    pub max_active_listings: u32,
    pub max_active_boosts: u32,
    pub boost_discount_percentage: u32,
    pub included_qr_credits_monthly: u32,
    pub qr_credit_rollover: bool,
    pub premium_listing_badge: bool,
    pub analytics_dashboard: bool,
    pub priority_support: bool,
}

impl Entitlements {
    /// Sellers without a subscription
    pub const FREE: Self = Self {
        max_active_listings: 1,
        max_active_boosts: 0,
        boost_discount_percentage: 0,
        included_qr_credits_monthly: 0,
        qr_credit_rollover: false,
        premium_listing_badge: false,
        analytics_dashboard: false,
        priority_support: false,
    };

    pub const BASIC: Self = Self {
        max_active_listings: 5,
        max_active_boosts: 1,
        boost_discount_percentage: 0,
        included_qr_credits_monthly: 10,
        qr_credit_rollover: false,
        premium_listing_badge: false,
        analytics_dashboard: false,
        priority_support: false,
    };

    pub const PRO: Self = Self {
        max_active_listings: 50,
        max_active_boosts: 5,
        boost_discount_percentage: 25,
        included_qr_credits_monthly: 50,
        qr_credit_rollover: true,
        premium_listing_badge: true,
        analytics_dashboard: true,
        priority_support: true,
    };

    /// Entitlements for the plan in force (`None` = free tier)
    pub fn for_plan(plan: Option<PlanType>) -> Self {
        match plan {
            None => Self::FREE,
            Some(PlanType::Basic) => Self::BASIC,
            Some(PlanType::Pro) => Self::PRO,
        }
    }
}

/// Current consumption of limited resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub active_listings: u32,
    pub active_boosts: u32,
    pub qr_credits_used_this_month: u32,
}

/// One limit with its consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitStatus {
    pub used: u32,
    pub limit: u32,
    #[serde(rename = "withinLimit")]
    pub within_limit: bool,
}

impl LimitStatus {
    /// A counted limit: room left while `used < limit`
    pub fn counted(used: u32, limit: u32) -> Self {
        Self {
            used,
            limit,
            within_limit: used < limit,
        }
    }

    /// A value-only entry (discounts, feature flags)
    pub fn value(limit: u32) -> Self {
        Self {
            used: 0,
            limit,
            within_limit: true,
        }
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}

/// Per-limit breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementLimits {
    pub max_active_listings: LimitStatus,
    pub max_active_boosts: LimitStatus,
    pub boost_discount_percentage: LimitStatus,
    pub included_qr_credits_monthly: LimitStatus,
    pub qr_credit_rollover: LimitStatus,
    pub premium_listing_badge: LimitStatus,
    pub analytics_dashboard: LimitStatus,
    pub priority_support: LimitStatus,
}

/// Entitlements, usage, and the derived limit table for one seller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementReport {
    pub limits: EntitlementLimits,
    pub usage: Usage,
    pub entitlements: Entitlements,
}

impl EntitlementReport {
    pub fn new(entitlements: Entitlements, usage: Usage) -> Self {
        let flag = |on: bool| LimitStatus::value(u32::from(on));
        let limits = EntitlementLimits {
            max_active_listings: LimitStatus::counted(
                usage.active_listings,
                entitlements.max_active_listings,
            ),
            max_active_boosts: LimitStatus::counted(
                usage.active_boosts,
                entitlements.max_active_boosts,
            ),
            boost_discount_percentage: LimitStatus::value(entitlements.boost_discount_percentage),
            included_qr_credits_monthly: LimitStatus::counted(
                usage.qr_credits_used_this_month,
                entitlements.included_qr_credits_monthly,
            ),
            qr_credit_rollover: flag(entitlements.qr_credit_rollover),
            premium_listing_badge: flag(entitlements.premium_listing_badge),
            analytics_dashboard: flag(entitlements.analytics_dashboard),
            priority_support: flag(entitlements.priority_support),
        };
        Self {
            limits,
            usage,
            entitlements,
        }
    }

    pub fn can_create_listing(&self) -> bool {
        self.limits.max_active_listings.within_limit
    }

    pub fn can_create_boost(&self) -> bool {
        self.limits.max_active_boosts.within_limit
    }

    /// Enough QR credits left for `amount` more uses
    pub fn can_use_qr_credit(&self, amount: u32) -> bool {
        self.limits.included_qr_credits_monthly.remaining() >= amount
    }

    pub fn boost_discount(&self) -> u32 {
        self.entitlements.boost_discount_percentage
    }

    pub fn has_premium_badge(&self) -> bool {
        self.entitlements.premium_listing_badge
    }

    pub fn has_analytics_access(&self) -> bool {
        self.entitlements.analytics_dashboard
    }

    pub fn has_priority_support(&self) -> bool {
        self.entitlements.priority_support
    }

    pub fn enforce_can_create_listing(&self) -> Result<(), DomainError> {
        if self.can_create_listing() {
            Ok(())
        } else {
            Err(DomainError::ListingLimitReached)
        }
    }

    pub fn enforce_can_create_boost(&self) -> Result<(), DomainError> {
        if self.can_create_boost() {
            Ok(())
        } else {
            Err(DomainError::BoostLimitReached)
        }
    }
}
