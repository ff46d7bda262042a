//! Configuration types.
//!
//! Everything is read once in `main` and passed down explicitly; no module
//! below it looks at the environment.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmConfig};

/// Substituted when no API key is configured. Every request made with it
/// fails at the provider.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    /// Whether the API key came from the environment or is the placeholder.
    pub api_key_configured: bool,
    /// Port for the JSON API.
    pub http_port: u16,
    /// Run the terminal walkthrough on stdin/stdout.
    pub interactive: bool,
}

impl AppConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("GEMINI_API_KEY").or_else(|| var("API_KEY"));
        let api_key_configured = api_key.is_some();
        let api_key = api_key.unwrap_or_else(|| {
            tracing::warn!(
                "GEMINI_API_KEY environment variable not set. Using a placeholder; \
                 generation requests will fail until a valid key is provided."
            );
            PLACEHOLDER_API_KEY.to_string()
        });

        let model = var("UPSKILL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = var("UPSKILL_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let http_port = match var("UPSKILL_HTTP_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "UPSKILL_HTTP_PORT".to_string(),
                message: format!("'{raw}' is not a valid port"),
            })?,
            None => 8080,
        };

        let timeout = match var("UPSKILL_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "UPSKILL_REQUEST_TIMEOUT_SECS".to_string(),
                    message: format!("'{raw}' is not a whole number of seconds"),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let interactive = var("UPSKILL_INTERACTIVE")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            llm: LlmConfig {
                api_key: SecretString::from(api_key),
                model,
                base_url,
                timeout,
            },
            api_key_configured,
            http_port,
            interactive,
        })
    }
}
