//! Maximum capital a bot can tie up, derived from its safety-order ladder.

use rust_decimal::Decimal;

use crate::domain::Bot;

use super::ReportError;

/// Capital requirements of one bot.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub bot_id: u64,
    /// Cost of each order of a single deal, base order first.
    pub ladder: Vec<Decimal>,
    /// Sum of the ladder: what one deal can consume.
    pub per_deal: Decimal,
    /// `per_deal * max_active_deals`.
    pub bot_max: Decimal,
}

impl Allocation {
    /// Share of `balance` the bot can consume, in percent.
    ///
    /// `None` for a non-positive balance or one so small the share
    /// overflows.
    pub fn percent_of_balance(&self, balance: Decimal) -> Option<Decimal> {
        if balance <= Decimal::ZERO {
            return None;
        }
        self.bot_max
            .checked_div(balance)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

/// Order costs of one deal.
///
/// Order 0 is the base order, order 1 the first safety order, and every
/// further order is the previous one times the martingale coefficient. The
/// ladder holds `max_safety_orders` entries and never less than the base
/// order. Returns `None` when an order cost overflows `Decimal`.
pub fn order_ladder(
    base_order: Decimal,
    safety_order: Decimal,
    step: Decimal,
    max_safety_orders: u32,
) -> Option<Vec<Decimal>> {
    let len = max_safety_orders.max(1) as usize;
    let mut ladder = Vec::new();
    ladder.push(base_order);

    let mut cost = safety_order;
    for k in 1..len {
        if k > 1 {
            cost = cost.checked_mul(step)?;
        }
        ladder.push(cost);
    }

    Some(ladder)
}

/// Computes the bot's theoretical maximum simultaneous exposure.
///
/// Fails with `ReportError::AllocationOverflow` when the ladder, its sum or
/// the bot maximum does not fit in a `Decimal`.
pub fn bot_allocation(bot: &Bot) -> Result<Allocation, ReportError> {
    let overflow = || ReportError::AllocationOverflow(bot.id);

    let ladder = order_ladder(
        bot.base_order_volume,
        bot.safety_order_volume,
        bot.martingale_volume_coefficient,
        bot.max_safety_orders,
    )
    .ok_or_else(overflow)?;
    let per_deal = ladder
        .iter()
        .try_fold(Decimal::ZERO, |acc, cost| acc.checked_add(*cost))
        .ok_or_else(overflow)?;
    let bot_max = per_deal
        .checked_mul(Decimal::from(bot.max_active_deals))
        .ok_or_else(overflow)?;

    Ok(Allocation {
        bot_id: bot.id,
        ladder,
        per_deal,
        bot_max,
    })
}
