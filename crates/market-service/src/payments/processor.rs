use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payment processor errors
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment processor not configured")]
    NotConfigured,

    #[error("Payment processor request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is the processor's own error message when present
    #[error("Payment processor error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected payment processor response: {0}")]
    Decode(String),
}

pub type PaymentResult<T> = Result<T, PaymentError>;

/// Connected account as returned by the processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorAccount {
    pub id: String,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub details_submitted: bool,
    #[serde(default)]
    pub requirements: Value,
}

impl ProcessorAccount {
    /// `requirements.disabled_reason`, if the processor set one
    pub fn disabled_reason(&self) -> Option<&str> {
        self.requirements.get("disabled_reason").and_then(Value::as_str)
    }
}

/// Parameters for a new custom connected account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateAccountParams {
    pub country: String,
    pub email: Option<String>,
    pub business_type: Option<String>,
    pub business_profile: Option<Value>,
    pub individual: Option<Value>,
    pub company: Option<Value>,
    pub tos_acceptance: Option<Value>,
}

/// A JSON block counts as present when it is an object with at least one key
fn non_empty_block(value: Option<Value>) -> Option<Value> {
    value.filter(|v| v.as_object().is_some_and(|o| !o.is_empty()))
}

impl CreateAccountParams {
    /// Build from the onboarding form, dropping empty blocks
    pub fn new(
        country: impl Into<String>,
        email: Option<String>,
        business_type: Option<String>,
        business_profile: Option<Value>,
        individual: Option<Value>,
        company: Option<Value>,
        tos_acceptance: Option<Value>,
    ) -> Self {
        Self {
            country: country.into(),
            email: email.filter(|e| !e.trim().is_empty()),
            business_type: business_type.filter(|t| !t.trim().is_empty()),
            business_profile: non_empty_block(business_profile),
            individual: non_empty_block(individual),
            company: non_empty_block(company),
            tos_acceptance: non_empty_block(tos_acceptance),
        }
    }

    /// Request body in the processor's nested JSON shape
    pub fn to_value(&self) -> Value {
        let mut body = Map::new();
        body.insert("type".into(), Value::from("custom"));
        body.insert("country".into(), Value::from(self.country.clone()));
        body.insert(
            "capabilities".into(),
            serde_json::json!({
                "card_payments": { "requested": true },
                "transfers": { "requested": true }
            }),
        );
        if let Some(email) = &self.email {
            body.insert("email".into(), Value::from(email.clone()));
        }
        if let Some(business_type) = &self.business_type {
            body.insert("business_type".into(), Value::from(business_type.clone()));
        }
        let blocks = [
            ("business_profile", &self.business_profile),
            ("individual", &self.individual),
            ("company", &self.company),
            ("tos_acceptance", &self.tos_acceptance),
        ];
        for (key, block) in blocks {
            if let Some(block) = block {
                body.insert(key.into(), block.clone());
            }
        }
        Value::Object(body)
    }
}

/// Free-form account update, forwarded as-is
#[derive(Debug, Clone, PartialEq)]
pub struct AccountUpdate(pub Value);

/// Identity document forwarded to the processor's file store
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Operations the marketplace needs from a payment processor
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a custom connected account
    async fn create_account(&self, params: &CreateAccountParams) -> PaymentResult<ProcessorAccount>;

    async fn retrieve_account(&self, account_id: &str) -> PaymentResult<ProcessorAccount>;

    async fn update_account(
        &self,
        account_id: &str,
        update: &AccountUpdate,
    ) -> PaymentResult<ProcessorAccount>;

    /// Attach a tokenized bank account; returns the processor's external account object
    async fn attach_external_account(&self, account_id: &str, bank_token: &str) -> PaymentResult<Value>;

    /// Store an identity document; returns the processor's file object
    async fn upload_identity_document(&self, document: &DocumentUpload) -> PaymentResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_blocks_are_dropped() {
        let params = CreateAccountParams::new(
            "BE",
            Some(String::new()),
            Some("individual".into()),
            Some(json!({})),
            Some(json!({"first_name": "An"})),
            None,
            Some(json!({"date": 1_700_000_000, "ip": "1.2.3.4"})),
        );

        assert!(params.email.is_none());
        assert!(params.business_profile.is_none());

        let body = params.to_value();
        assert_eq!(body["type"], "custom");
        assert_eq!(body["country"], "BE");
        assert_eq!(body["capabilities"]["transfers"]["requested"], true);
        assert_eq!(body["individual"]["first_name"], "An");
        assert!(body.get("company").is_none());
        assert!(body.get("email").is_none());
    }

    #[test]
    fn test_account_disabled_reason() {
        let account: ProcessorAccount = serde_json::from_value(json!({
            "id": "acct_1",
            "details_submitted": true,
            "requirements": {"disabled_reason": "rejected.fraud"}
        }))
        .unwrap();

        assert!(!account.charges_enabled);
        assert_eq!(account.disabled_reason(), Some("rejected.fraud"));
    }
}
