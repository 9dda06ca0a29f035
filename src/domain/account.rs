//! Exchange accounts connected to the platform.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::numeric::lenient_decimal;

/// Account is one connected exchange with its USD-denominated balance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub usd_amount: Decimal,
}

/// Sum of USD balances across all accounts.
pub fn total_usd_balance(accounts: &[Account]) -> Decimal {
    accounts.iter().map(|a| a.usd_amount).sum()
}
