//! Profit/loss, fee and capital allocation reports for 3Commas DCA bots.

pub mod config;
pub mod domain;
pub mod report;
pub mod threecommas;
