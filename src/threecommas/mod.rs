//! 3Commas API integration: the client trait the reports depend on and its
//! signed HTTP implementation.

mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use client::{ApiError, Client, ClientConfig, ClientError, Result};

use async_trait::async_trait;
use std::fmt;

use crate::domain::{Account, Bot, Deal};

/// Maximum page size accepted by the deals endpoint.
pub const MAX_DEALS_PAGE: u32 = 1000;

/// Maximum page size accepted by the bots endpoint.
pub const MAX_BOTS_PAGE: u32 = 100;

/// Deal scope filter understood by the deals endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every deal that has left the active state.
    Finished,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Finished => "finished",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ThreeCommasApi is the read-only slice of the 3Commas API used by the
/// reports. Every call is a single request; retries live in the client.
#[async_trait]
pub trait ThreeCommasApi: Send + Sync {
    /// Lists bots, one page at a time.
    async fn list_bots(&self, limit: u32, offset: u32) -> Result<Vec<Bot>>;

    /// Fetches a single bot by id.
    async fn show_bot(&self, bot_id: u64) -> Result<Bot>;

    /// Lists deals, optionally restricted to one bot.
    async fn list_deals(
        &self,
        bot_id: Option<u64>,
        offset: u32,
        limit: u32,
        scope: Scope,
    ) -> Result<Vec<Deal>>;

    /// Lists connected exchange accounts.
    async fn list_accounts(&self) -> Result<Vec<Account>>;
}
