//! Bot records and their safety-order ladder parameters.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::numeric::{lenient_decimal, lenient_u32};

/// Bot is a DCA bot as reported by the bots endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bot {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account_id: Option<u64>,
    /// Cost of the first order of every deal.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub base_order_volume: Decimal,
    /// Cost of the first safety order.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub safety_order_volume: Decimal,
    /// Multiplier applied to each successive safety order.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub martingale_volume_coefficient: Decimal,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub max_safety_orders: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub max_active_deals: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub finished_deals_count: u32,
}
