//! Application-level configuration.

use serde::Deserialize;

/// Application-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Application name used in logs.
    #[serde(default = "default_name")]
    pub name: String,
    /// Logging verbosity: "debug", "info", "warn", "error".
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: None,
        }
    }
}

fn default_name() -> String {
    "dca-pl".to_string()
}
