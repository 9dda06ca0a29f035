//! Domain models for DCA bots, their deals and accounts.

mod account;
mod bot;
mod deal;
mod fees;
mod numeric;

pub use account::{Account, total_usd_balance};
pub use bot::Bot;
pub use deal::{Deal, DealStatus, parse_timestamp};
pub use fees::FeeMode;
pub use numeric::parse_decimal;
