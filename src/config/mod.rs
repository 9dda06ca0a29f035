//! Configuration loading and validation.
//!
//! Uses serde_yaml to load the YAML configuration file, with environment
//! variable overrides for the API credentials.

mod api;
mod app;
mod duration;
mod error;
mod report;

pub use api::{ApiConfig, DEFAULT_BASE_URL};
pub use app::AppConfig;
pub use error::ConfigError;
pub use report::{DEFAULT_OMIT_STATUSES, FeeModeKind, ReportConfig, parse_status_list};

use serde::Deserialize;
use std::{env, fs};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "THREECOMMAS_API_KEY";
/// Environment variable holding the API secret.
pub const API_SECRET_ENV: &str = "THREECOMMAS_API_SECRET";

/// Root configuration structure.
///
/// Every section is optional; `api` credentials must be present after
/// environment overrides are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Application-level settings.
    #[serde(default)]
    pub app: AppConfig,
    /// 3Commas client settings and credentials.
    #[serde(default)]
    pub api: ApiConfig,
    /// Deal report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Loads `.env` first (if present), then the YAML file, then applies
    /// `THREECOMMAS_API_KEY` / `THREECOMMAS_API_SECRET` on top.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_string(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;

        config.load_credentials_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Parses configuration from YAML without touching the environment.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid config made of defaults.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overrides credentials from environment variables when set.
    fn load_credentials_from_env(&mut self) {
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.api.api_key = key;
            }
        }
        if let Ok(secret) = env::var(API_SECRET_ENV) {
            if !secret.is_empty() {
                self.api.api_secret = secret;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.api_key.is_empty() || self.api.api_secret.is_empty() {
            return Err(ConfigError::Validation(format!(
                "API credentials not found (set api.api_key/api.api_secret or {} and {})",
                API_KEY_ENV, API_SECRET_ENV
            )));
        }

        if self.api.base_url.is_empty() {
            return Err(ConfigError::Validation("api.base_url must not be empty".into()));
        }

        if self.api.request_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "api.request_timeout must be positive".into(),
            ));
        }

        if let Some(ref outfile) = self.report.outfile {
            if outfile.trim().is_empty() {
                return Err(ConfigError::Validation("report.outfile must not be empty".into()));
            }
        }

        self.report.fee_mode()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
