//! Entitlement service
//!
//! Plan limits for business sellers, checked against live usage.

use tracing::{debug, instrument};
use uuid::Uuid;

use market_core::entities::Profile;
use market_core::value_objects::{EntitlementReport, Entitlements};

use crate::dto::EntitlementsResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Entitlement service
pub struct EntitlementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EntitlementService<'a> {
    /// Create a new EntitlementService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Limits, usage and flags for the caller
    #[instrument(skip(self))]
    pub async fn report(&self, user_id: Uuid) -> ServiceResult<EntitlementsResponse> {
        let profile = self
            .ctx
            .profile_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Profile", user_id.to_string()))?;

        let plan = profile.subscription().and_then(|s| s.effective_plan());
        let report = self.report_for(&profile).await?;

        Ok(EntitlementsResponse {
            plan,
            entitlements: report.entitlements,
            usage: report.usage,
            limits: report.limits,
            can_create_listing: report.can_create_listing(),
            can_create_boost: report.can_create_boost(),
        })
    }

    /// Report for an already loaded profile
    pub async fn report_for(&self, profile: &Profile) -> ServiceResult<EntitlementReport> {
        let plan = profile.subscription().and_then(|s| s.effective_plan());
        let usage = self.ctx.profile_repo().usage(profile.id).await?;
        Ok(EntitlementReport::new(Entitlements::for_plan(plan), usage))
    }

    /// Fails with `ListingLimitReached` when a business seller is at the plan limit
    pub async fn ensure_can_create_listing(&self, profile: &Profile) -> ServiceResult<()> {
        if !profile.is_business_profile() {
            return Ok(());
        }
        let report = self.report_for(profile).await?;
        debug!(
            user_id = %profile.id,
            used = report.usage.active_listings,
            limit = report.entitlements.max_active_listings,
            "Checked listing entitlement"
        );
        report.enforce_can_create_listing()?;
        Ok(())
    }
}
