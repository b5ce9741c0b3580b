//! Business subscription plans
//!
//! Plans are stored two ways: a `business_plan` string such as
//! `"pro_jaarlijks"`, and newer `plan`/`billing_cycle` keys inside the
//! profile's `business` JSON. The JSON wins when both are present.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Basic,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl PlanType {
    fn parse_loose(s: &str) -> Self {
        if s.to_lowercase().contains("pro") {
            Self::Pro
        } else {
            Self::Basic
        }
    }
}

impl BillingCycle {
    fn parse_loose(s: &str) -> Self {
        let s = s.to_lowercase();
        if s.contains("jaarlijks") || s.contains("yearly") {
            Self::Yearly
        } else {
            Self::Monthly
        }
    }
}

/// Split a `business_plan` string into plan and billing cycle
pub fn parse_business_plan(business_plan: Option<&str>) -> Option<(PlanType, BillingCycle)> {
    let normalized = business_plan?.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    Some((
        PlanType::parse_loose(&normalized),
        BillingCycle::parse_loose(&normalized),
    ))
}

/// Build the stored `business_plan` string, e.g. `basis_maandelijks`
pub fn format_business_plan(plan: PlanType, billing: BillingCycle) -> String {
    let plan = match plan {
        PlanType::Pro => "pro",
        PlanType::Basic => "basis",
    };
    let billing = match billing {
        BillingCycle::Yearly => "jaarlijks",
        BillingCycle::Monthly => "maandelijks",
    };
    format!("{plan}_{billing}")
}

/// A non-blank plan string counts as an active subscription
pub fn is_subscription_active(business_plan: Option<&str>) -> bool {
    business_plan.is_some_and(|p| !p.trim().is_empty())
}

/// Resolved subscription of a business
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionData {
    pub plan: PlanType,
    pub billing: BillingCycle,
    pub subscription_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_updated_at: Option<String>,
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl SubscriptionData {
    /// Resolve from the business JSON first, then the plan string
    pub fn resolve(business: &Value, business_plan: Option<&str>) -> Option<Self> {
        let plan = business.get("plan").and_then(json_text);
        let billing = business.get("billing_cycle").and_then(json_text);

        if let (Some(plan), Some(billing)) = (plan, billing) {
            let subscription_active = business
                .get("subscription_active")
                .map_or(true, truthy);
            return Some(Self {
                plan: PlanType::parse_loose(&plan),
                billing: BillingCycle::parse_loose(&billing),
                subscription_active,
                subscription_updated_at: business
                    .get("subscription_updated_at")
                    .and_then(json_text),
            });
        }

        parse_business_plan(business_plan).map(|(plan, billing)| Self {
            plan,
            billing,
            subscription_active: is_subscription_active(business_plan),
            subscription_updated_at: None,
        })
    }

    /// Plan that is actually in force
    pub fn effective_plan(&self) -> Option<PlanType> {
        self.subscription_active.then_some(self.plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_business_plan() {
        assert_eq!(
            parse_business_plan(Some("pro_jaarlijks")),
            Some((PlanType::Pro, BillingCycle::Yearly))
        );
        assert_eq!(
            parse_business_plan(Some(" Basis_Maandelijks ")),
            Some((PlanType::Basic, BillingCycle::Monthly))
        );
        assert_eq!(
            parse_business_plan(Some("basic-yearly")),
            Some((PlanType::Basic, BillingCycle::Yearly))
        );
        assert_eq!(parse_business_plan(Some("   ")), None);
        assert_eq!(parse_business_plan(None), None);
    }

    #[test]
    fn test_format_business_plan() {
        assert_eq!(format_business_plan(PlanType::Pro, BillingCycle::Yearly), "pro_jaarlijks");
        assert_eq!(format_business_plan(PlanType::Basic, BillingCycle::Monthly), "basis_maandelijks");
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        for plan in [PlanType::Basic, PlanType::Pro] {
            for billing in [BillingCycle::Monthly, BillingCycle::Yearly] {
                let s = format_business_plan(plan, billing);
                assert_eq!(parse_business_plan(Some(&s)), Some((plan, billing)));
            }
        }
    }

    #[test]
    fn test_resolve_prefers_business_json() {
        let business = json!({ "plan": "Pro", "billing_cycle": "Yearly" });
        let data = SubscriptionData::resolve(&business, Some("basis_maandelijks")).unwrap();
        assert_eq!(data.plan, PlanType::Pro);
        assert_eq!(data.billing, BillingCycle::Yearly);
        assert!(data.subscription_active);
    }

    #[test]
    fn test_resolve_respects_explicit_inactive() {
        let business = json!({ "plan": "basic", "billing_cycle": "monthly", "subscription_active": false });
        let data = SubscriptionData::resolve(&business, None).unwrap();
        assert!(!data.subscription_active);
        assert_eq!(data.effective_plan(), None);
    }

    #[test]
    fn test_resolve_falls_back_to_plan_string() {
        let data = SubscriptionData::resolve(&Value::Null, Some("pro_maandelijks")).unwrap();
        assert_eq!(data.plan, PlanType::Pro);
        assert_eq!(data.billing, BillingCycle::Monthly);
        assert!(data.subscription_active);

        assert!(SubscriptionData::resolve(&json!({ "plan": "pro" }), None).is_none());
    }
}
