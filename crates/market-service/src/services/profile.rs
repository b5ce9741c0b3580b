//! Profile service

use tracing::instrument;
use uuid::Uuid;

use market_core::entities::Profile;

use crate::dto::{CurrentProfileResponse, ProfileResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's own profile
    #[instrument(skip(self))]
    pub async fn me(&self, user_id: Uuid) -> ServiceResult<CurrentProfileResponse> {
        let profile = self.load(user_id).await?;
        Ok(CurrentProfileResponse {
            profile: ProfileResponse::from(&profile),
            business_plan: profile.business_plan.clone(),
            has_payment_account: profile.has_payment_account(),
        })
    }

    /// Public view of any profile
    #[instrument(skip(self))]
    pub async fn get(&self, profile_id: Uuid) -> ServiceResult<ProfileResponse> {
        let profile = self.load(profile_id).await?;
        Ok(ProfileResponse::from(&profile))
    }

    async fn load(&self, id: Uuid) -> ServiceResult<Profile> {
        self.ctx
            .profile_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Profile", id.to_string()))
    }
}
