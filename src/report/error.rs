//! Report error types.

use crate::config::ConfigError;
use crate::threecommas::ClientError;

/// Report error type.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("api error: {0}")]
    Api(#[from] ClientError),
    #[error("no outfile configured (set report.outfile in {0} or pass --no-log)")]
    MissingOutfile(String),
    #[error("allocation of bot {0} overflows")]
    AllocationOverflow(u64),
    #[error("failed to write report output: {0}")]
    Output(#[source] std::io::Error),
    #[error("failed to write deal log {path}: {source}")]
    Log {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
