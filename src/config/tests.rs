//! Tests for config module.

use super::*;
use crate::domain::{DealStatus, FeeMode};
use rust_decimal::Decimal;
use std::env;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

// ==================== Duration parsing tests ====================

#[test]
fn test_parse_duration_seconds() {
    let d = duration::parse_duration("30s").unwrap();
    assert_eq!(d, Duration::from_secs(30));
}

#[test]
fn test_parse_duration_minutes() {
    let d = duration::parse_duration("5m").unwrap();
    assert_eq!(d, Duration::from_secs(300));
}

#[test]
fn test_parse_duration_milliseconds() {
    let d = duration::parse_duration("100ms").unwrap();
    assert_eq!(d, Duration::from_millis(100));
}

#[test]
fn test_parse_duration_bare_number_is_seconds() {
    let d = duration::parse_duration("10").unwrap();
    assert_eq!(d, Duration::from_secs(10));
}

#[test]
fn test_parse_duration_invalid_unit() {
    let result = duration::parse_duration("10x");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("unknown duration unit"));
}

// ==================== YAML field loading tests ====================

fn minimal_valid_yaml() -> String {
    r#"
api:
  api_key: key
  api_secret: secret
"#
    .to_string()
}

#[test]
fn test_minimal_config_defaults() {
    let cfg = Config::from_yaml(&minimal_valid_yaml()).unwrap();

    assert_eq!(cfg.app.name, "dca-pl");
    assert_eq!(cfg.app.log_level, None);
    assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.api.request_timeout, Duration::from_secs(10));
    assert_eq!(cfg.api.retries, 1);
    assert_eq!(cfg.api.retry_status_codes, vec![502]);
    assert_eq!(cfg.report.outfile, None);
    assert_eq!(cfg.report.fee_mode, FeeModeKind::None);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_load_all_fields() {
    let yaml = r#"
app:
  name: my-report
  log_level: debug

api:
  base_url: http://localhost:8080
  api_key: k
  api_secret: s
  request_timeout: 2500ms
  retries: 2
  retry_status_codes: [502, 503]

report:
  outfile: deals.csv
  omit_statuses: "cancelled, failed, panic_sold"
  fee_mode: flat_percentage
  exchange_fee: "0.075"
"#;
    let cfg = Config::from_yaml(yaml).unwrap();

    assert_eq!(cfg.app.name, "my-report");
    assert_eq!(cfg.app.log_level.as_deref(), Some("debug"));
    assert_eq!(cfg.api.base_url, "http://localhost:8080");
    assert_eq!(cfg.api.request_timeout, Duration::from_millis(2500));
    assert_eq!(cfg.api.retries, 2);
    assert_eq!(cfg.api.retry_status_codes, vec![502, 503]);
    assert_eq!(cfg.report.outfile.as_deref(), Some("deals.csv"));
    assert_eq!(
        cfg.report.fee_mode().unwrap(),
        FeeMode::FlatPercentage(Decimal::new(75, 3))
    );

    let omit = cfg.report.omit_set();
    assert_eq!(omit.len(), 3);
    assert!(omit.contains(&DealStatus::PanicSold));
}

#[test]
fn test_empty_yaml_is_defaults() {
    let cfg = Config::from_yaml("").unwrap();
    assert!(cfg.api.api_key.is_empty());
    assert_eq!(cfg.report.omit_statuses, DEFAULT_OMIT_STATUSES);
}

#[test]
fn test_invalid_yaml() {
    let result = Config::from_yaml("api: [unclosed");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_unknown_fee_mode_rejected() {
    let yaml = r#"
report:
  fee_mode: percentage_of_moon
"#;
    assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::Parse(_))));
}

// ==================== Omit-set tests ====================

#[test]
fn test_default_omit_set() {
    let omit = ReportConfig::default().omit_set();
    assert_eq!(omit.len(), 2);
    assert!(omit.contains(&DealStatus::Cancelled));
    assert!(omit.contains(&DealStatus::Failed));
}

#[test]
fn test_parse_status_list_trims_and_skips_blanks() {
    let omit = parse_status_list(" cancelled ,, failed ,");
    assert_eq!(omit.len(), 2);
    assert!(omit.contains(&DealStatus::Cancelled));
    assert!(omit.contains(&DealStatus::Failed));
}

#[test]
fn test_parse_status_list_empty_omits_nothing() {
    assert!(parse_status_list("").is_empty());
}

// ==================== Environment override tests ====================

#[test]
fn test_credentials_from_env() {
    let mut cfg = Config::from_yaml(&minimal_valid_yaml()).unwrap();

    // Set env vars (unsafe because modifying env is not thread-safe)
    unsafe {
        env::set_var(API_KEY_ENV, "env-key");
        env::set_var(API_SECRET_ENV, "env-secret");
    }
    cfg.load_credentials_from_env();
    assert_eq!(cfg.api.api_key, "env-key");
    assert_eq!(cfg.api.api_secret, "env-secret");

    // Empty values leave the file credentials alone
    let mut cfg = Config::from_yaml(&minimal_valid_yaml()).unwrap();
    unsafe {
        env::set_var(API_KEY_ENV, "");
        env::set_var(API_SECRET_ENV, "");
    }
    cfg.load_credentials_from_env();
    assert_eq!(cfg.api.api_key, "key");
    assert_eq!(cfg.api.api_secret, "secret");

    // Cleanup
    unsafe {
        env::remove_var(API_KEY_ENV);
        env::remove_var(API_SECRET_ENV);
    }
}

// ==================== Validation tests ====================

#[test]
fn test_validate_missing_credentials() {
    let cfg = Config::from_yaml("report:\n  outfile: out.csv\n").unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("API credentials not found"));
}

#[test]
fn test_validate_flat_fee_requires_exchange_fee() {
    let yaml = format!("{}\nreport:\n  fee_mode: flat_percentage\n", minimal_valid_yaml());
    let cfg = Config::from_yaml(&yaml).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("exchange_fee is required"));
}

#[test]
fn test_validate_exchange_fee_out_of_range() {
    let yaml = format!(
        "{}\nreport:\n  fee_mode: flat_percentage\n  exchange_fee: \"150\"\n",
        minimal_valid_yaml()
    );
    let cfg = Config::from_yaml(&yaml).unwrap();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_validate_exchange_fee_not_a_number() {
    let yaml = format!(
        "{}\nreport:\n  fee_mode: flat_percentage\n  exchange_fee: half\n",
        minimal_valid_yaml()
    );
    let cfg = Config::from_yaml(&yaml).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("invalid number"));
}

#[test]
fn test_validate_empty_outfile() {
    let yaml = format!("{}\nreport:\n  outfile: \"  \"\n", minimal_valid_yaml());
    let cfg = Config::from_yaml(&yaml).unwrap();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_validate_zero_timeout() {
    let yaml = r#"
api:
  api_key: k
  api_secret: s
  request_timeout: 0s
"#;
    let cfg = Config::from_yaml(yaml).unwrap();
    assert!(cfg.validate().is_err());
}

// ==================== File loading tests ====================

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "api:\n  api_key: file-key\n  api_secret: file-secret\nreport:\n  outfile: out.csv"
    )
    .unwrap();

    let cfg = Config::load(file.path().to_str().unwrap()).unwrap();
    assert!(!cfg.api.api_key.is_empty());
    assert_eq!(cfg.report.outfile.as_deref(), Some("out.csv"));
}

#[test]
fn test_load_missing_file() {
    let result = Config::load("/nonexistent/dca-pl/config.yaml");
    match result {
        Err(ConfigError::ReadFile { path, .. }) => {
            assert_eq!(path, "/nonexistent/dca-pl/config.yaml");
        }
        other => panic!("expected ReadFile error, got {:?}", other),
    }
}
