//! Profile entity <-> model mapper

use market_core::entities::Profile;
use market_core::value_objects::Usage;

use crate::models::{ProfileModel, UsageModel};

impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Profile {
            id: model.id,
            full_name: model.full_name,
            shop_name: model.shop_name,
            company_name: model.company_name,
            avatar_url: model.avatar_url,
            business_logo_url: model.business_logo_url,
            is_business: model.is_business,
            business_plan: model.business_plan,
            business: model.business,
            categories: model.categories,
            city: model.city,
            address: model.address,
            invoice_address: model.invoice_address,
            rating: model.rating,
            avg_rating: model.avg_rating,
            review_count: model.review_count,
            stripe_account_id: model.stripe_account_id,
            created_at: model.created_at,
        }
    }
}

fn count(v: i64) -> u32 {
    u32::try_from(v.max(0)).unwrap_or(u32::MAX)
}

impl From<UsageModel> for Usage {
    fn from(model: UsageModel) -> Self {
        Usage {
            active_listings: count(model.active_listings),
            active_boosts: count(model.active_boosts),
            qr_credits_used_this_month: count(model.qr_credits_used_this_month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_clamps_negative_counts() {
        let usage = Usage::from(UsageModel {
            active_listings: 3,
            active_boosts: -1,
            qr_credits_used_this_month: 0,
        });
        assert_eq!(usage.active_listings, 3);
        assert_eq!(usage.active_boosts, 0);
    }
}
