//! Exchange fee models applied to deal P/L.

use rust_decimal::Decimal;

/// FeeMode selects how exchange fees are taken out of a deal's P/L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeeMode {
    /// Raw P/L: sold minus bought, no fee deducted.
    #[default]
    None,
    /// A flat percentage (e.g. 0.5 for 0.5%) charged on both legs.
    FlatPercentage(Decimal),
}

impl FeeMode {
    /// Fee rate as a fraction (0.5% → 0.005).
    pub fn rate(&self) -> Decimal {
        match self {
            FeeMode::None => Decimal::ZERO,
            FeeMode::FlatPercentage(pct) => *pct / Decimal::ONE_HUNDRED,
        }
    }

    /// Total fee charged on a deal with the given legs.
    pub fn fee(&self, sold: Decimal, bought: Decimal) -> Decimal {
        let rate = self.rate();
        sold * rate + bought * rate
    }

    /// P/L after fees.
    pub fn net_pl(&self, sold: Decimal, bought: Decimal) -> Decimal {
        let rate = self.rate();
        (sold - sold * rate) - (bought - bought * rate)
    }
}
