//! Application configuration loaded from environment variables.
//!
//! Provider credentials are read once at startup and held in memory for the
//! lifetime of the process.

use std::env;

/// Which login strategy `/auth/login` uses.
///
/// `MagicLink` proves email possession via a one-time token sent by mail.
/// `Direct` issues a session token immediately with no email round-trip.
/// A deployment picks exactly one; they are never mixed under the same route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    MagicLink,
    Direct,
}

impl LoginMode {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "magic-link" => Ok(LoginMode::MagicLink),
            "direct" => Ok(LoginMode::Direct),
            _ => Err(ConfigError::Invalid("LOGIN_MODE")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for verification links and payment redirects
    pub frontend_url: String,
    /// Login strategy for /auth/login
    pub login_mode: LoginMode,
    /// Directory for uploaded photos and rendered portraits
    pub upload_dir: String,

    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,

    // --- Provider endpoints and credentials ---
    /// OpenAI API base URL (overridable for tests)
    pub openai_api_url: String,
    /// OpenAI API key
    pub openai_api_key: String,
    /// PayPal API base URL (sandbox by default)
    pub paypal_api_url: String,
    /// PayPal OAuth client ID
    pub paypal_client_id: String,
    /// PayPal OAuth client secret
    pub paypal_client_secret: String,
    /// Printify API base URL
    pub printify_api_url: String,
    /// Printify API key (empty means simulated product creation)
    pub printify_api_key: String,
    /// Printify shop ID
    pub printify_shop_id: String,
    /// Mail API base URL (empty means mail transport not configured)
    pub mail_api_url: String,
    /// Mail API key
    pub mail_api_key: String,
    /// Sender address for outbound mail
    pub mail_from: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            login_mode: LoginMode::parse(
                &env::var("LOGIN_MODE").unwrap_or_else(|_| "magic-link".to_string()),
            )?,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),

            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY")
                .map_err(|_| ConfigError::Missing("OPENAI_API_KEY"))?,
            paypal_api_url: env::var("PAYPAL_API_URL")
                .unwrap_or_else(|_| "https://api.sandbox.paypal.com".to_string()),
            paypal_client_id: env::var("PAYPAL_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("PAYPAL_CLIENT_ID"))?,
            paypal_client_secret: env::var("PAYPAL_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("PAYPAL_CLIENT_SECRET"))?,
            printify_api_url: env::var("PRINTIFY_API_URL")
                .unwrap_or_else(|_| "https://api.printify.com/v1".to_string()),
            printify_api_key: env::var("PRINTIFY_API_KEY").unwrap_or_default(),
            printify_shop_id: env::var("PRINTIFY_SHOP_ID")
                .unwrap_or_else(|_| "shop-demo".to_string()),
            mail_api_url: env::var("MAIL_API_URL").unwrap_or_default(),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "portraits@localhost".to_string()),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            login_mode: LoginMode::MagicLink,
            upload_dir: std::env::temp_dir()
                .join("pet-portrait-test-uploads")
                .to_string_lossy()
                .into_owned(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            openai_api_url: "http://localhost:0".to_string(),
            openai_api_key: "test_openai_key".to_string(),
            paypal_api_url: "http://localhost:0".to_string(),
            paypal_client_id: "test_paypal_id".to_string(),
            paypal_client_secret: "test_paypal_secret".to_string(),
            printify_api_url: "http://localhost:0".to_string(),
            printify_api_key: String::new(),
            printify_shop_id: "shop-demo".to_string(),
            mail_api_url: "http://localhost:0".to_string(),
            mail_api_key: "test_mail_key".to_string(),
            mail_from: "test@localhost".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
