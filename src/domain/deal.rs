//! Deal records returned by the 3Commas deals endpoint.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::numeric::decimal_from_value;

/// DealStatus is the lifecycle state reported by the platform for a deal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DealStatus {
    Created,
    BaseOrderPlaced,
    Bought,
    Cancelled,
    Completed,
    PanicSellPending,
    PanicSellOrderPlaced,
    PanicSold,
    CancelPending,
    StopLossPending,
    StopLossFinished,
    StopLossOrderPlaced,
    Switched,
    SwitchedTakeProfit,
    TtpActivated,
    TtpOrderPlaced,
    Liquidated,
    BoughtSafetyPending,
    BoughtTakeProfitPending,
    Settled,
    Failed,
    /// Any status this build does not know about yet.
    Other(String),
}

impl DealStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DealStatus::Created => "created",
            DealStatus::BaseOrderPlaced => "base_order_placed",
            DealStatus::Bought => "bought",
            DealStatus::Cancelled => "cancelled",
            DealStatus::Completed => "completed",
            DealStatus::PanicSellPending => "panic_sell_pending",
            DealStatus::PanicSellOrderPlaced => "panic_sell_order_placed",
            DealStatus::PanicSold => "panic_sold",
            DealStatus::CancelPending => "cancel_pending",
            DealStatus::StopLossPending => "stop_loss_pending",
            DealStatus::StopLossFinished => "stop_loss_finished",
            DealStatus::StopLossOrderPlaced => "stop_loss_order_placed",
            DealStatus::Switched => "switched",
            DealStatus::SwitchedTakeProfit => "switched_take_profit",
            DealStatus::TtpActivated => "ttp_activated",
            DealStatus::TtpOrderPlaced => "ttp_order_placed",
            DealStatus::Liquidated => "liquidated",
            DealStatus::BoughtSafetyPending => "bought_safety_pending",
            DealStatus::BoughtTakeProfitPending => "bought_take_profit_pending",
            DealStatus::Settled => "settled",
            DealStatus::Failed => "failed",
            DealStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_lowercase().as_str() {
            "created" => DealStatus::Created,
            "base_order_placed" => DealStatus::BaseOrderPlaced,
            "bought" => DealStatus::Bought,
            "cancelled" => DealStatus::Cancelled,
            "completed" => DealStatus::Completed,
            "panic_sell_pending" => DealStatus::PanicSellPending,
            "panic_sell_order_placed" => DealStatus::PanicSellOrderPlaced,
            "panic_sold" => DealStatus::PanicSold,
            "cancel_pending" => DealStatus::CancelPending,
            "stop_loss_pending" => DealStatus::StopLossPending,
            "stop_loss_finished" => DealStatus::StopLossFinished,
            "stop_loss_order_placed" => DealStatus::StopLossOrderPlaced,
            "switched" => DealStatus::Switched,
            "switched_take_profit" => DealStatus::SwitchedTakeProfit,
            "ttp_activated" => DealStatus::TtpActivated,
            "ttp_order_placed" => DealStatus::TtpOrderPlaced,
            "liquidated" => DealStatus::Liquidated,
            "bought_safety_pending" => DealStatus::BoughtSafetyPending,
            "bought_take_profit_pending" => DealStatus::BoughtTakeProfitPending,
            "settled" => DealStatus::Settled,
            "failed" => DealStatus::Failed,
            other => DealStatus::Other(other.to_string()),
        };
        Ok(status)
    }
}

/// Deal is one finished trade lifecycle of a bot.
///
/// The typed accessors cover what the report needs; every field the server
/// sent is kept in `fields`, in server order, for the flat deal log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Deal {
    pub id: Option<u64>,
    pub bot_id: Option<u64>,
    pub status: DealStatus,
    pub sold_volume: Decimal,
    pub bought_volume: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for Deal {
    fn from(fields: Map<String, Value>) -> Self {
        let status = fields
            .get("status")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| DealStatus::Other(String::new()));

        Self {
            id: fields.get("id").and_then(id_from_value),
            bot_id: fields.get("bot_id").and_then(id_from_value),
            status,
            sold_volume: fields.get("sold_volume").and_then(decimal_from_value).unwrap_or_default(),
            bought_volume: fields
                .get("bought_volume")
                .and_then(decimal_from_value)
                .unwrap_or_default(),
            created_at: fields
                .get("created_at")
                .and_then(Value::as_str)
                .and_then(parse_timestamp),
            closed_at: fields
                .get("closed_at")
                .and_then(Value::as_str)
                .and_then(parse_timestamp),
            fields,
        }
    }
}

impl Deal {
    /// Raw fields as received from the server.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Seconds between opening and closing, when both timestamps are known.
    pub fn duration_secs(&self) -> Option<i64> {
        match (self.created_at, self.closed_at) {
            (Some(created), Some(closed)) => Some(closed.timestamp() - created.timestamp()),
            _ => None,
        }
    }
}

fn id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses a platform timestamp at whole-second resolution.
///
/// The fractional part is dropped before parsing, so `10:00:00.900Z` and
/// `10:00:00Z` are the same instant. Timestamps without an offset are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (seconds, offset) = match raw.find('.') {
        Some(dot) => {
            let rest = &raw[dot + 1..];
            let tz_start = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            (&raw[..dot], &rest[tz_start..])
        }
        None => {
            let time_start = raw.find(|c: char| c == 'T' || c == ' ').unwrap_or(0);
            match raw[time_start..].find(|c: char| c == 'Z' || c == '+' || c == '-') {
                Some(idx) => raw.split_at(time_start + idx),
                None => (raw, ""),
            }
        }
    };

    let naive = NaiveDateTime::parse_from_str(seconds, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(seconds, "%Y-%m-%d %H:%M:%S"))
        .ok()?;

    match offset {
        "" | "Z" | "z" => Some(naive.and_utc()),
        offset => DateTime::parse_from_str(
            &format!("{}{}", naive.format("%Y-%m-%dT%H:%M:%S"), offset),
            "%Y-%m-%dT%H:%M:%S%:z",
        )
        .ok()
        .map(|dt| dt.with_timezone(&Utc)),
    }
}
