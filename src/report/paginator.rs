//! Offset pagination over the finished-deals list.

use tracing::{debug, info};

use crate::domain::Deal;
use crate::threecommas::{MAX_BOTS_PAGE, MAX_DEALS_PAGE, Result, Scope, ThreeCommasApi};

/// Offsets of the pages needed to cover `total` records.
///
/// Always at least one page, so an empty or unknown total still issues a
/// single fetch. Offsets stop at the last one that fits in a `u32`.
pub fn page_offsets(total: u64, page_size: u32) -> Vec<u32> {
    let page_size = u64::from(page_size.max(1));
    let pages = total.div_ceil(page_size).max(1);
    (0..pages)
        .map_while(|page| u32::try_from(page * page_size).ok())
        .collect()
}

/// Number of finished deals the platform reports for one bot or for all
/// bots of the account.
pub async fn finished_deals_count(api: &dyn ThreeCommasApi, bot_id: Option<u64>) -> Result<u64> {
    if let Some(bot_id) = bot_id {
        let bot = api.show_bot(bot_id).await?;
        return Ok(u64::from(bot.finished_deals_count));
    }

    let mut total = 0u64;
    let mut offset = 0u32;
    loop {
        let bots = api.list_bots(MAX_BOTS_PAGE, offset).await?;
        let fetched = bots.len() as u32;
        total += bots
            .iter()
            .map(|b| u64::from(b.finished_deals_count))
            .sum::<u64>();

        debug!(offset, bots = fetched, "fetched bots page");

        if fetched < MAX_BOTS_PAGE {
            break;
        }
        offset += MAX_BOTS_PAGE;
    }

    Ok(total)
}

/// Fetches every finished deal, page by page, in server order.
///
/// Any failed page aborts the whole fetch; partial results are dropped.
pub async fn fetch_finished_deals(
    api: &dyn ThreeCommasApi,
    bot_id: Option<u64>,
) -> Result<Vec<Deal>> {
    let total = finished_deals_count(api, bot_id).await?;
    let offsets = page_offsets(total, MAX_DEALS_PAGE);

    info!(bot_id = ?bot_id, finished = total, pages = offsets.len(), "fetching finished deals");

    let mut deals = Vec::with_capacity(total.min(u64::from(MAX_DEALS_PAGE)) as usize);
    for offset in offsets {
        let page = api
            .list_deals(bot_id, offset, MAX_DEALS_PAGE, Scope::Finished)
            .await?;
        debug!(offset, deals = page.len(), "fetched deals page");
        deals.extend(page);
    }

    Ok(deals)
}
