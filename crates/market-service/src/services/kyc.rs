//! KYC service
//!
//! Seller onboarding with the payment processor: connected account creation,
//! verification status, identity documents, bank accounts and later account
//! updates.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use market_core::entities::Profile;
use market_core::value_objects::{check_identity_document, KycStatus};

use crate::dto::{
    ExternalAccountRequest, ExternalAccountResponse, KycAccountResponse, KycAccountSnapshot,
    KycFileResponse, KycOnboardRequest, KycStatusResponse, OnboardResponse, VerificationResponse,
};
use crate::payments::{AccountUpdate, CreateAccountParams, DocumentUpload};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Used for terms acceptance when the caller's address is unknown
const FALLBACK_TOS_IP: &str = "127.0.0.1";

/// Adds `tos_acceptance {date, ip}` unless the update already carries one
fn with_tos_acceptance(mut update: Value, client_ip: Option<&str>) -> ServiceResult<Value> {
    let fields = update
        .as_object_mut()
        .ok_or_else(|| ServiceError::validation("Ongeldige accountgegevens"))?;
    if !fields.contains_key("tos_acceptance") {
        fields.insert(
            "tos_acceptance".to_string(),
            json!({
                "date": Utc::now().timestamp(),
                "ip": client_ip.filter(|ip| !ip.is_empty()).unwrap_or(FALLBACK_TOS_IP),
            }),
        );
    }
    Ok(update)
}

/// KYC service
pub struct KycService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> KycService<'a> {
    /// Create a new KycService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create the caller's connected account, or return the existing one
    #[instrument(skip(self, form))]
    pub async fn onboard(&self, user_id: Uuid, form: KycOnboardRequest) -> ServiceResult<OnboardResponse> {
        let payments = self.ctx.payments()?;
        let profile = self.profile(user_id).await?;
        if let Some(account_id) = profile.stripe_account_id.filter(|id| !id.is_empty()) {
            return Ok(OnboardResponse { account_id });
        }

        let bank_token = form.bank_token().map(str::to_string);
        let params = CreateAccountParams::new(
            self.ctx.payments_country(),
            form.email,
            form.business_type,
            form.business_profile,
            form.individual,
            form.company,
            form.tos_acceptance,
        );
        let account = payments
            .create_account(&params)
            .await
            .map_err(|e| ServiceError::payment("ONBOARD_FAILED", e))?;

        if let Some(token) = bank_token {
            if let Err(e) = payments.attach_external_account(&account.id, &token).await {
                warn!(account_id = %account.id, error = %e, "Attaching bank account failed");
            }
        }

        self.ctx
            .profile_repo()
            .set_payment_account(user_id, &account.id)
            .await?;

        info!(user_id = %user_id, account_id = %account.id, "Connected account created");

        Ok(OnboardResponse {
            account_id: account.id,
        })
    }

    /// Verification status with the account snapshot
    #[instrument(skip(self))]
    pub async fn status(&self, user_id: Uuid) -> ServiceResult<KycStatusResponse> {
        let payments = self.ctx.payments()?;
        let profile = self.profile(user_id).await?;
        let Some(account_id) = profile.stripe_account_id.filter(|id| !id.is_empty()) else {
            let status = KycStatus::NotOnboarded;
            return Ok(KycStatusResponse {
                status: status.as_str(),
                message: status.message(),
                account: None,
            });
        };

        let account = payments
            .retrieve_account(&account_id)
            .await
            .map_err(|e| ServiceError::payment("STATUS_FAILED", e))?;
        let status = KycStatus::from_account(
            account.details_submitted,
            account.charges_enabled,
            account.disabled_reason(),
        );

        Ok(KycStatusResponse {
            status: status.as_str(),
            message: status.message(),
            account: Some(KycAccountSnapshot::from(&account)),
        })
    }

    /// `verified` once the account holder submitted their details
    #[instrument(skip(self))]
    pub async fn verification(&self, user_id: Uuid) -> ServiceResult<VerificationResponse> {
        let payments = self.ctx.payments()?;
        let account_id = self
            .ctx
            .profile_repo()
            .find_by_id(user_id)
            .await?
            .and_then(|p| p.stripe_account_id)
            .filter(|id| !id.is_empty());
        let Some(account_id) = account_id else {
            return Ok(VerificationResponse { verified: false });
        };

        let account = payments
            .retrieve_account(&account_id)
            .await
            .map_err(|e| ServiceError::payment("VERIFICATION_FAILED", e))?;

        Ok(VerificationResponse {
            verified: account.details_submitted,
        })
    }

    /// Forward an identity document to the processor's file store
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_identity_document(
        &self,
        user_id: Uuid,
        file_name: Option<String>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> ServiceResult<KycFileResponse> {
        let content_type = check_identity_document(bytes.len(), content_type)?;
        let payments = self.ctx.payments()?;

        let document = DocumentUpload {
            file_name: file_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("upload-{}", Utc::now().timestamp_millis())),
            content_type,
            bytes,
        };
        let file = payments
            .upload_identity_document(&document)
            .await
            .map_err(|e| ServiceError::payment("FILE_UPLOAD_FAILED", e))?;

        info!(user_id = %user_id, file_name = %document.file_name, "Identity document uploaded");

        Ok(KycFileResponse { file })
    }

    /// Attach a tokenized bank account to the caller's own connected account
    #[instrument(skip(self, request))]
    pub async fn add_external_account(
        &self,
        user_id: Uuid,
        request: ExternalAccountRequest,
    ) -> ServiceResult<ExternalAccountResponse> {
        let payments = self.ctx.payments()?;
        let account_id = request
            .account_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ServiceError::validation("accountId ontbreekt"))?;
        let bank_token = request
            .bank_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ServiceError::validation("bankToken ontbreekt"))?;

        let profile = self.profile(user_id).await?;
        if profile.stripe_account_id.as_deref() != Some(account_id.as_str()) {
            return Err(ServiceError::forbidden("Geen toegang tot dit account"));
        }

        let external_account = payments
            .attach_external_account(&account_id, &bank_token)
            .await
            .map_err(|e| ServiceError::payment("EXTERNAL_FAILED", e))?;

        info!(user_id = %user_id, account_id = %account_id, "Bank account attached");

        Ok(ExternalAccountResponse { external_account })
    }

    /// Forward extra verification details to the caller's connected account
    #[instrument(skip(self, update))]
    pub async fn update_account(
        &self,
        user_id: Uuid,
        update: Value,
        client_ip: Option<&str>,
    ) -> ServiceResult<KycAccountResponse> {
        let payments = self.ctx.payments()?;
        let profile = self.profile(user_id).await?;
        let account_id = profile
            .stripe_account_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::validation("No connected account"))?;

        let update = AccountUpdate(with_tos_acceptance(update, client_ip)?);
        let account = payments
            .update_account(&account_id, &update)
            .await
            .map_err(|e| ServiceError::payment("UPDATE_FAILED", e))?;

        info!(user_id = %user_id, account_id = %account_id, "Connected account updated");

        Ok(KycAccountResponse {
            account: KycAccountSnapshot::from(&account),
        })
    }

    async fn profile(&self, user_id: Uuid) -> ServiceResult<Profile> {
        self.ctx
            .profile_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Profile", user_id.to_string()))
    }
}
