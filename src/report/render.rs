//! Terminal output for the P/L and allocation reports.

use rust_decimal::Decimal;

use super::aggregator::{DealResult, Totals};
use super::allocation::Allocation;

/// Lines printed for a single deal.
pub fn deal_block(result: &DealResult) -> String {
    let id = result
        .deal_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());

    let mut out = format!(
        "Deal ID: {}\n\
         -----\n\
         Status: {}\n\
         P/L: {} ({})\n",
        id,
        result.status,
        format_money(result.pl),
        format_percent(result.pl_percent)
    );
    if !result.fee.is_zero() {
        out.push_str(&format!("Fee: {}\n", format_money(result.fee)));
    }
    if let Some(secs) = result.duration_secs {
        out.push_str(&format!("Duration: {}\n", format_duration(secs)));
    }
    out
}

/// Totals block. `allocation` is the user-supplied capital size, if any.
pub fn totals_block(totals: &Totals, allocation: Option<Decimal>) -> String {
    let mut out = format!(
        "Totals\n\
         -----\n\
         Deals Completed: {}\n\
         P/L: {}\n",
        add_thousand_separators(&totals.count.to_string()),
        format_money(totals.total_pl)
    );
    if !totals.total_fee.is_zero() {
        out.push_str(&format!("Fees: {}\n", format_money(totals.total_fee)));
    }
    if let Some(pct) = allocation.and_then(|size| totals.percent_of(size)) {
        out.push_str(&format!("P/L of Allocation: {}\n", format_percent(pct)));
    }
    out.push_str(&format!(
        "Average P/L: {}\n",
        format_percent(totals.average_pl_percent())
    ));
    if totals.timed_count > 0 {
        out.push_str(&format!(
            "Total Duration: {}\n",
            format_duration(totals.total_duration_secs)
        ));
    }
    if let Some(avg) = totals.average_duration_secs() {
        out.push_str(&format!("Average Duration: {}\n", format_duration(avg)));
    }
    out
}

/// Allocation summary for one bot.
pub fn allocation_block(allocation: &Allocation, balance: Option<Decimal>) -> String {
    let mut out = format!(
        "Bot ID: {}\n\
         -----\n\
         Orders per Deal: {}\n\
         Max per Deal: {}\n\
         Bot Max: {}\n",
        allocation.bot_id,
        allocation.ladder.len(),
        format_money(allocation.per_deal),
        format_money(allocation.bot_max)
    );
    if let Some(balance) = balance {
        out.push_str(&format!("Account Balance: {}\n", format_money(balance)));
        if let Some(pct) = allocation.percent_of_balance(balance) {
            out.push_str(&format!("Allocated: {}\n", format_percent(pct)));
        }
    }
    out
}

/// Formats a USD amount: `-$1,234.50`.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = format!("{:.2}", rounded.abs());
    let (int, frac) = abs.split_once('.').unwrap_or((abs.as_str(), "00"));
    format!("{}${}.{}", sign, add_thousand_separators(int), frac)
}

/// Formats a percentage with two decimals.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

/// Formats seconds as a short human duration.
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Adds thousands separators to a string of digits.
fn add_thousand_separators(digits: &str) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
