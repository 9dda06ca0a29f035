//! Per-deal P/L and the running totals of a report.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::domain::{Deal, DealStatus, FeeMode};

/// Values derived from a single deal.
#[derive(Debug, Clone, PartialEq)]
pub struct DealResult {
    pub deal_id: Option<u64>,
    pub status: DealStatus,
    /// Realized P/L under the configured fee model.
    pub pl: Decimal,
    /// Fees charged on both legs (zero without a fee model).
    pub fee: Decimal,
    /// `round(1 - bought/sold, 4) * 100`, zero unless both legs are positive.
    pub pl_percent: Decimal,
    /// Whole seconds from open to close, if known.
    pub duration_secs: Option<i64>,
}

/// Return on sold notional, in percent.
///
/// Zero when a leg is missing or the ratio does not fit in a `Decimal`.
pub fn pl_percent(sold: Decimal, bought: Decimal) -> Decimal {
    if sold <= Decimal::ZERO || bought <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    bought
        .checked_div(sold)
        .and_then(|ratio| Decimal::ONE.checked_sub(ratio))
        .and_then(|ret| ret.round_dp(4).checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Computes P/L, fee, percentage and duration for one deal.
pub fn evaluate(deal: &Deal, fee_mode: FeeMode) -> DealResult {
    let sold = deal.sold_volume;
    let bought = deal.bought_volume;

    DealResult {
        deal_id: deal.id,
        status: deal.status.clone(),
        pl: fee_mode.net_pl(sold, bought),
        fee: fee_mode.fee(sold, bought),
        pl_percent: pl_percent(sold, bought),
        duration_secs: deal.duration_secs(),
    }
}

/// Deals whose status is not in the omit-set, in their original order.
pub fn included<'a>(deals: &'a [Deal], omit: &HashSet<DealStatus>) -> Vec<&'a Deal> {
    deals.iter().filter(|d| !omit.contains(&d.status)).collect()
}

/// Aggregate figures over the included deals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub count: u64,
    pub total_pl: Decimal,
    pub total_fee: Decimal,
    /// Sum of per-deal percentages; divided by `count` for the average.
    pub pl_percent_sum: Decimal,
    pub total_duration_secs: i64,
    /// Deals that contributed to `total_duration_secs`.
    pub timed_count: u64,
}

impl Totals {
    /// Adds one deal to the running totals.
    pub fn add(&mut self, result: &DealResult) {
        self.count += 1;
        self.total_pl += result.pl;
        self.total_fee += result.fee;
        self.pl_percent_sum += result.pl_percent;
        if let Some(secs) = result.duration_secs {
            self.total_duration_secs += secs;
            self.timed_count += 1;
        }
    }

    /// Unweighted mean of per-deal P/L percentages.
    pub fn average_pl_percent(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        self.pl_percent_sum / Decimal::from(self.count)
    }

    /// Mean deal duration in whole seconds over deals with known timestamps.
    pub fn average_duration_secs(&self) -> Option<i64> {
        if self.timed_count == 0 {
            return None;
        }
        Some(self.total_duration_secs / self.timed_count as i64)
    }

    /// Total P/L as a percentage of a user-supplied allocation size.
    pub fn percent_of(&self, allocation: Decimal) -> Option<Decimal> {
        if allocation <= Decimal::ZERO {
            return None;
        }
        self.total_pl
            .checked_div(allocation)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

/// Result of aggregating a deal list.
#[derive(Debug, Clone, Default)]
pub struct Aggregate<'a> {
    /// Included deals, in fetch order.
    pub deals: Vec<&'a Deal>,
    /// One result per included deal, same order as `deals`.
    pub results: Vec<DealResult>,
    pub totals: Totals,
}

/// Filters out omitted statuses and accumulates the rest.
pub fn aggregate<'a>(
    deals: &'a [Deal],
    omit: &HashSet<DealStatus>,
    fee_mode: FeeMode,
) -> Aggregate<'a> {
    let mut agg = Aggregate::default();
    for deal in included(deals, omit) {
        let result = evaluate(deal, fee_mode);
        agg.totals.add(&result);
        agg.results.push(result);
        agg.deals.push(deal);
    }
    agg
}
