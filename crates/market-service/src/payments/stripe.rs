use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use market_common::PaymentsConfig;

use super::processor::{
    AccountUpdate, CreateAccountParams, DocumentUpload, PaymentError, PaymentProcessor,
    PaymentResult, ProcessorAccount,
};

const DEFAULT_FILES_BASE: &str = "https://files.stripe.com";

/// Flatten nested JSON into form pairs with bracketed keys
///
/// `{"individual": {"dob": {"day": 1}}}` becomes `individual[dob][day]=1`,
/// arrays use numeric indexes, nulls are skipped.
pub fn flatten_form(value: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    flatten_into(String::new(), value, &mut pairs);
    pairs
}

fn flatten_into(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    let key = |k: &str| {
        if prefix.is_empty() {
            k.to_string()
        } else {
            format!("{prefix}[{k}]")
        }
    };
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (k, v) in map {
                flatten_into(key(k), v, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_into(key(&i.to_string()), v, out);
            }
        }
        Value::String(s) => out.push((prefix, s.clone())),
        Value::Bool(b) => out.push((prefix, b.to_string())),
        Value::Number(n) => out.push((prefix, n.to_string())),
    }
}

/// REST client for the payment processor
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_base: String,
    /// File uploads live on their own host
    files_base: String,
    secret_key: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .field("files_base", &self.files_base)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            files_base: DEFAULT_FILES_BASE.to_string(),
            secret_key: secret_key.into(),
        }
    }

    #[must_use]
    pub fn with_files_base(mut self, files_base: impl Into<String>) -> Self {
        self.files_base = files_base.into().trim_end_matches('/').to_string();
        self
    }

    /// `None` when no secret key is configured
    pub fn from_config(config: &PaymentsConfig) -> Option<Self> {
        if !config.is_enabled() {
            return None;
        }
        config
            .secret_key
            .as_deref()
            .map(|key| {
                Self::new(config.api_base.clone(), key.trim()).with_files_base(config.files_base.clone())
            })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path.trim_start_matches('/'))
    }

    fn files_url(&self) -> String {
        format!("{}/v1/files", self.files_base)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> PaymentResult<T> {
        let resp = request
            .header(header::AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            warn!(status = status.as_u16(), message = %message, "Payment processor rejected request");
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| PaymentError::Decode(e.to_string()))
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, body: &Value) -> PaymentResult<T> {
        let form = flatten_form(body);
        debug!(path = %path, fields = form.len(), "Payment processor POST");
        self.send(self.http.post(self.url(path)).form(&form)).await
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    #[instrument(skip(self, params), fields(country = %params.country))]
    async fn create_account(&self, params: &CreateAccountParams) -> PaymentResult<ProcessorAccount> {
        self.post_form("accounts", &params.to_value()).await
    }

    #[instrument(skip(self))]
    async fn retrieve_account(&self, account_id: &str) -> PaymentResult<ProcessorAccount> {
        self.send(self.http.get(self.url(&format!("accounts/{account_id}"))))
            .await
    }

    #[instrument(skip(self, update))]
    async fn update_account(
        &self,
        account_id: &str,
        update: &AccountUpdate,
    ) -> PaymentResult<ProcessorAccount> {
        self.post_form(&format!("accounts/{account_id}"), &update.0)
            .await
    }

    #[instrument(skip(self, bank_token))]
    async fn attach_external_account(&self, account_id: &str, bank_token: &str) -> PaymentResult<Value> {
        let body = serde_json::json!({ "external_account": bank_token });
        self.post_form(&format!("accounts/{account_id}/external_accounts"), &body)
            .await
    }

    #[instrument(skip(self, document), fields(size = document.bytes.len(), content_type = %document.content_type))]
    async fn upload_identity_document(&self, document: &DocumentUpload) -> PaymentResult<Value> {
        let part = reqwest::multipart::Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(&document.content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("purpose", "identity_document")
            .part("file", part);

        debug!(file_name = %document.file_name, "Payment processor file upload");
        self.send(self.http.post(self.files_url()).multipart(form)).await
    }
}
