//! P/L and allocation reports over 3Commas data.
//!
//! Both reports take the API client and settings as arguments; nothing is
//! read from globals.

pub mod aggregator;
pub mod allocation;
mod error;
pub mod log;
pub mod paginator;
pub mod render;

pub use aggregator::{Aggregate, DealResult, Totals, aggregate};
pub use allocation::{Allocation, bot_allocation};
pub use error::ReportError;
pub use paginator::fetch_finished_deals;

use std::io::Write;
use std::path::PathBuf;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::domain::total_usd_balance;
use crate::threecommas::ThreeCommasApi;

/// Options of a single P/L run, mostly from the command line.
#[derive(Debug, Clone, Default)]
pub struct PlOptions {
    /// Restrict the report to one bot.
    pub bot_id: Option<u64>,
    /// Print nothing to the terminal.
    pub quiet: bool,
    /// Skip writing the deal log.
    pub no_log: bool,
    /// Print only the totals block.
    pub totals_only: bool,
    /// Capital size to express total P/L against.
    pub allocation: Option<Decimal>,
}

/// Runs the P/L report: fetch, filter, aggregate, print, then write the log.
///
/// `config_path` only appears in error messages.
pub async fn run_pl(
    api: &dyn ThreeCommasApi,
    settings: &ReportConfig,
    config_path: &str,
    opts: &PlOptions,
    out: &mut dyn Write,
) -> Result<Totals, ReportError> {
    let outfile = if opts.no_log {
        None
    } else {
        let path = settings
            .outfile
            .as_deref()
            .ok_or_else(|| ReportError::MissingOutfile(config_path.to_string()))?;
        Some(PathBuf::from(path))
    };

    let omit = settings.omit_set();
    let fee_mode = settings.fee_mode()?;

    let deals = fetch_finished_deals(api, opts.bot_id).await?;
    let agg = aggregate(&deals, &omit, fee_mode);

    info!(
        fetched = deals.len(),
        included = agg.deals.len(),
        omitted = deals.len() - agg.deals.len(),
        "deals filtered"
    );

    if !opts.quiet && !opts.totals_only {
        for result in &agg.results {
            writeln!(out, "{}", render::deal_block(result)).map_err(ReportError::Output)?;
        }
    }

    if !opts.quiet {
        write!(out, "{}", render::totals_block(&agg.totals, opts.allocation))
            .map_err(ReportError::Output)?;
    }

    if let Some(path) = outfile {
        log::write(&path, deals.first(), &agg.deals)?;
        info!(path = %path.display(), rows = agg.deals.len(), "deal log written");
    }

    Ok(agg.totals)
}

/// Runs the allocation report for one bot.
pub async fn run_allocation(
    api: &dyn ThreeCommasApi,
    bot_id: u64,
    out: &mut dyn Write,
) -> Result<Allocation, ReportError> {
    let bot = api.show_bot(bot_id).await?;
    let allocation = bot_allocation(&bot)?;

    let accounts = api.list_accounts().await?;
    let balance = total_usd_balance(&accounts);
    if balance.is_zero() {
        warn!(accounts = accounts.len(), "account balance is zero");
    }

    info!(
        bot_id,
        bot_max = %allocation.bot_max,
        balance = %balance,
        "allocation computed"
    );

    write!(out, "{}", render::allocation_block(&allocation, Some(balance)))
        .map_err(ReportError::Output)?;

    Ok(allocation)
}
