//! In-memory ThreeCommasApi for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{ApiError, ClientError, Result, Scope, ThreeCommasApi};
use crate::domain::{Account, Bot, Deal};

/// A recorded `list_deals` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DealCall {
    pub bot_id: Option<u64>,
    pub offset: u32,
    pub limit: u32,
    pub scope: Scope,
}

/// Mock API serving fixed bots, deals and accounts.
#[derive(Default)]
pub struct MockApi {
    pub bots: Vec<Bot>,
    pub deals: Vec<Deal>,
    pub accounts: Vec<Account>,
    pub fail_at_offset: Option<u32>,
    pub deal_calls: Mutex<Vec<DealCall>>,
    pub bot_calls: Mutex<Vec<u32>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bot(mut self, value: Value) -> Self {
        self.bots.push(serde_json::from_value(value).unwrap());
        self
    }

    pub fn with_deal(mut self, value: Value) -> Self {
        self.deals.push(serde_json::from_value(value).unwrap());
        self
    }

    /// Adds `count` completed deals with sequential ids for one bot.
    pub fn with_numbered_deals(mut self, bot_id: u64, count: u64) -> Self {
        let start = self.deals.len() as u64;
        for id in start..start + count {
            self.deals.push(
                serde_json::from_value(json!({
                    "id": id,
                    "bot_id": bot_id,
                    "status": "completed",
                    "sold_volume": "1",
                    "bought_volume": "1"
                }))
                .unwrap(),
            );
        }
        self
    }

    pub fn with_account(mut self, value: Value) -> Self {
        self.accounts.push(serde_json::from_value(value).unwrap());
        self
    }

    pub fn with_fail_at(mut self, offset: u32) -> Self {
        self.fail_at_offset = Some(offset);
        self
    }

    pub fn deal_offsets(&self) -> Vec<u32> {
        self.deal_calls.lock().unwrap().iter().map(|c| c.offset).collect()
    }
}

fn api_error(status: u16, code: &str) -> ClientError {
    ClientError::Api(ApiError {
        status,
        code: code.to_string(),
        message: code.replace('_', " "),
    })
}

#[async_trait]
impl ThreeCommasApi for MockApi {
    async fn list_bots(&self, limit: u32, offset: u32) -> Result<Vec<Bot>> {
        self.bot_calls.lock().unwrap().push(offset);
        Ok(self
            .bots
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn show_bot(&self, bot_id: u64) -> Result<Bot> {
        self.bots
            .iter()
            .find(|b| b.id == bot_id)
            .cloned()
            .ok_or_else(|| api_error(404, "record_not_found"))
    }

    async fn list_deals(
        &self,
        bot_id: Option<u64>,
        offset: u32,
        limit: u32,
        scope: Scope,
    ) -> Result<Vec<Deal>> {
        self.deal_calls.lock().unwrap().push(DealCall {
            bot_id,
            offset,
            limit,
            scope,
        });

        if self.fail_at_offset == Some(offset) {
            return Err(api_error(429, "rate_limit_exceeded"));
        }

        Ok(self
            .deals
            .iter()
            .filter(|d| bot_id.is_none() || d.bot_id == bot_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }
}
