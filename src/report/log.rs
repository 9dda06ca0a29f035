//! Flat comma-delimited dump of raw deal fields.
//!
//! The header is the field names of the first fetched deal. Values are not
//! quoted or escaped, so a value containing a comma shifts its row.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::domain::Deal;

use super::ReportError;

/// Renders the header and one row per deal.
///
/// `first` is the first deal of the fetch, which may itself be excluded
/// from `rows`. Each row follows the header's field order; fields a deal
/// lacks are left empty.
pub fn render(first: Option<&Deal>, rows: &[&Deal]) -> String {
    let Some(first) = first else {
        return String::new();
    };

    let header: Vec<&str> = first.fields().keys().map(String::as_str).collect();

    let mut out = header.join(",");
    out.push('\n');

    for deal in rows {
        let line = header
            .iter()
            .map(|key| deal.fields().get(*key).map(stringify).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Writes the log in one go, replacing any previous file.
pub fn write(path: &Path, first: Option<&Deal>, rows: &[&Deal]) -> Result<(), ReportError> {
    fs::write(path, render(first, rows)).map_err(|source| ReportError::Log {
        path: path.display().to_string(),
        source,
    })
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
