//! Model API client configuration.
//!
//! Base URL and model default to the hosted endpoint; the API key is
//! always required. Override via environment variables or explicit
//! construction for staging and tests.

use url::Url;

/// Configuration for the chat-completions endpoint.
///
/// Custom `Debug` implementation redacts the `api_key` field to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct ModelApiConfig {
    /// Base URL of the OpenAI-compatible API.
    /// Default: <https://api.openai.com/v1>
    pub base_url: Url,
    /// Bearer token for API authentication.
    pub api_key: String,
    /// Model identifier to request.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ModelApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ModelApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GSTD_MODEL_URL` (default: `https://api.openai.com/v1`)
    /// - `GSTD_MODEL_API_KEY` (required)
    /// - `GSTD_MODEL_NAME` (default: `gpt-4o-mini`)
    /// - `GSTD_MODEL_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            std::env::var("GSTD_MODEL_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;

        Ok(Self {
            base_url: env_url("GSTD_MODEL_URL", "https://api.openai.com/v1")?,
            api_key,
            model: std::env::var("GSTD_MODEL_NAME")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout_secs: std::env::var("GSTD_MODEL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Create a configuration pointing to an explicit endpoint (used by
    /// tests against a mock server).
    pub fn for_endpoint(base_url: Url, api_key: &str) -> Self {
        Self {
            base_url,
            api_key: api_key.to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 5,
        }
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The `GSTD_MODEL_API_KEY` environment variable is not set.
    #[error("GSTD_MODEL_API_KEY environment variable is required")]
    MissingApiKey,
    /// A URL variable did not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// The API key cannot be carried in an HTTP header.
    #[error("API key contains characters not permitted in an HTTP header")]
    InvalidApiKey,
    /// The underlying HTTP client failed to initialize.
    #[error("failed to initialize HTTP client: {0}")]
    HttpClient(String),
}
