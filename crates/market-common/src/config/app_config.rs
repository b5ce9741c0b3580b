//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub gateway: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub payments: PaymentsConfig,
    pub messaging: MessagingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Server configuration (for both API and Gateway)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Access token validation settings
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Expected `aud` claim; unchecked when unset
    #[serde(default)]
    pub audience: Option<String>,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Object storage used for chat attachments
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the storage host, e.g. `https://xyz.supabase.co`
    pub public_url: String,
    #[serde(default = "default_chat_bucket")]
    pub chat_bucket: String,
}

/// Payment processor settings
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentsConfig {
    #[serde(default = "default_payments_api_base")]
    pub api_base: String,
    /// Host for identity document uploads
    #[serde(default = "default_payments_files_base")]
    pub files_base: String,
    /// Payments are disabled without a key
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default = "default_payments_country")]
    pub country: String,
}

impl PaymentsConfig {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.secret_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Chat message rate limit: at most `max_messages` per `window_secs`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MessagingConfig {
    #[serde(default = "default_message_rate_count")]
    pub max_messages: u32,
    #[serde(default = "default_message_rate_window")]
    pub window_secs: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            max_messages: default_message_rate_count(),
            window_secs: default_message_rate_window(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "market-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_gateway_port() -> u16 {
    8081
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_storage_public_url() -> String {
    "http://127.0.0.1:54321".to_string()
}

fn default_chat_bucket() -> String {
    "chat-attachments".to_string()
}

fn default_payments_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_payments_files_base() -> String {
    "https://files.stripe.com".to_string()
}

fn default_payments_country() -> String {
    "BE".to_string()
}

fn default_message_rate_count() -> u32 {
    20
}

fn default_message_rate_window() -> u64 {
    60
}

/// Required variable
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Optional string variable; blank counts as unset
fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Optional typed variable with a default; present but unparsable is an error
fn parsed<T: FromStr>(name: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(default()),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let env = match optional("APP_ENV") {
            Some(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        Ok(Self {
            app: AppSettings {
                name: optional("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ServerConfig {
                host: optional("API_HOST").unwrap_or_else(default_host),
                port: parsed("API_PORT", default_api_port)?,
            },
            gateway: ServerConfig {
                host: optional("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parsed("GATEWAY_PORT", default_gateway_port)?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parsed("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            redis: RedisConfig {
                url: optional("REDIS_URL").unwrap_or_else(default_redis_url),
                max_connections: parsed("REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
            },
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                audience: optional("JWT_AUDIENCE"),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parsed("RATE_LIMIT_RPS", default_requests_per_second)?,
                burst: parsed("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: optional("CORS_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                public_url: optional("STORAGE_PUBLIC_URL")
                    .unwrap_or_else(default_storage_public_url)
                    .trim_end_matches('/')
                    .to_string(),
                chat_bucket: optional("CHAT_BUCKET").unwrap_or_else(default_chat_bucket),
            },
            payments: PaymentsConfig {
                api_base: optional("PAYMENTS_API_BASE")
                    .unwrap_or_else(default_payments_api_base)
                    .trim_end_matches('/')
                    .to_string(),
                files_base: optional("PAYMENTS_FILES_BASE")
                    .unwrap_or_else(default_payments_files_base)
                    .trim_end_matches('/')
                    .to_string(),
                secret_key: optional("PAYMENTS_SECRET_KEY"),
                country: optional("PAYMENTS_COUNTRY").unwrap_or_else(default_payments_country),
            },
            messaging: MessagingConfig {
                max_messages: parsed("MESSAGE_RATE_LIMIT_COUNT", default_message_rate_count)?,
                window_secs: parsed("MESSAGE_RATE_LIMIT_WINDOW_SECS", default_message_rate_window)?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
