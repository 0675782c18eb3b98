use crate::core::enrichment::enrich;
use crate::domain::model::DealRecord;
use crate::domain::ports::CrmClient;
use crate::utils::error::Result;

/// Only the first page is read; later pages are not traversed.
pub const DEALS_PAGE_SIZE: usize = 25;

/// Reads one page of deals and enriches each, in API order.
///
/// A failed page read is returned as an error. A failed enrichment only
/// degrades that deal (see [`enrich`]).
pub async fn fetch_deals_with_associations(client: &dyn CrmClient) -> Result<Vec<DealRecord>> {
    let deals = client.get_deals_page(DEALS_PAGE_SIZE).await?;
    tracing::info!("📥 Enriching {} deals", deals.len());

    let mut records = Vec::with_capacity(deals.len());
    for deal in deals {
        records.push(enrich(deal, client).await);
    }

    let degraded = records.iter().filter(|r| !r.is_enriched()).count();
    if degraded > 0 {
        tracing::warn!("⚠️ {} of {} deals returned without associations", degraded, records.len());
    } else {
        tracing::info!("✅ Deals with associations fetched successfully");
    }

    Ok(records)
}
