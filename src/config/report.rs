//! Deal report settings: log output, status filtering and fee model.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{DealStatus, FeeMode, parse_decimal};

use super::ConfigError;

/// Statuses left out of the report when `omit_statuses` is not set.
pub const DEFAULT_OMIT_STATUSES: &str = "cancelled,failed";

/// How fees are applied, as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeModeKind {
    #[default]
    None,
    FlatPercentage,
}

/// Deal report settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Path of the flat deal log. Required unless logging is suppressed.
    pub outfile: Option<String>,
    /// Comma-separated deal statuses excluded from the report.
    #[serde(default = "default_omit_statuses")]
    pub omit_statuses: String,
    /// Fee model used for P/L.
    #[serde(default)]
    pub fee_mode: FeeModeKind,
    /// Exchange fee in percent (e.g. "0.5"), used by `flat_percentage`.
    pub exchange_fee: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            outfile: None,
            omit_statuses: default_omit_statuses(),
            fee_mode: FeeModeKind::default(),
            exchange_fee: None,
        }
    }
}

fn default_omit_statuses() -> String {
    DEFAULT_OMIT_STATUSES.to_string()
}

impl ReportConfig {
    /// Parsed omit-set. Entries are trimmed and blanks dropped.
    pub fn omit_set(&self) -> HashSet<DealStatus> {
        parse_status_list(&self.omit_statuses)
    }

    /// Resolved fee model.
    pub fn fee_mode(&self) -> Result<FeeMode, ConfigError> {
        match self.fee_mode {
            FeeModeKind::None => Ok(FeeMode::None),
            FeeModeKind::FlatPercentage => {
                let raw = self.exchange_fee.as_deref().ok_or_else(|| {
                    ConfigError::Validation(
                        "report.exchange_fee is required for fee_mode flat_percentage".into(),
                    )
                })?;
                let pct = parse_decimal(raw).ok_or_else(|| {
                    ConfigError::Validation(format!("report.exchange_fee: invalid number {:?}", raw))
                })?;
                if pct < Decimal::ZERO || pct >= Decimal::ONE_HUNDRED {
                    return Err(ConfigError::Validation(format!(
                        "report.exchange_fee must be in [0, 100), got {}",
                        pct
                    )));
                }
                Ok(FeeMode::FlatPercentage(pct))
            }
        }
    }
}

/// Parses "cancelled, failed" into a status set.
pub fn parse_status_list(raw: &str) -> HashSet<DealStatus> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}
