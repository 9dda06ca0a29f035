//! 3Commas API connection settings.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Production 3Commas API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.3commas.io";

/// Settings for the 3Commas REST client.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API base URL, without the `/public/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key. `THREECOMMAS_API_KEY` overrides this value.
    #[serde(default)]
    pub api_key: String,
    /// API secret. `THREECOMMAS_API_SECRET` overrides this value.
    #[serde(default)]
    pub api_secret: String,
    /// Timeout for a single HTTP request.
    #[serde(default = "default_request_timeout", with = "duration")]
    pub request_timeout: Duration,
    /// How many times a request is repeated on a retryable status.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// HTTP status codes that trigger a retry.
    #[serde(default = "default_retry_status_codes")]
    pub retry_status_codes: Vec<u16>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            api_secret: String::new(),
            request_timeout: default_request_timeout(),
            retries: default_retries(),
            retry_status_codes: default_retry_status_codes(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_retries() -> u32 {
    1
}

fn default_retry_status_codes() -> Vec<u16> {
    vec![502]
}
