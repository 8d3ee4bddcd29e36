//! Per-cycle repricing.
//!
//! For each tracked item: fetch sell and buy listings, convert them to
//! scrap at a freshly fetched key rate, trim both tails, compute the
//! undercut quote, and persist it. Items with no surviving samples on
//! either side are skipped for the cycle — never quoted at zero.

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::backpack::ListingSource;
use crate::pricing::{self, Quote};
use crate::storage::{Database, PriceRecord};
use crate::types::Intent;

/// One item we maintain listings for.
#[derive(Debug, Clone)]
pub struct TrackedItem {
    pub name: String,
    /// Sell floor in scrap: never sell below what the item cost us.
    pub cost_floor_scrap: i64,
}

/// Counts from one repricing pass.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub key_rate: Decimal,
    pub items_priced: u64,
    pub items_skipped: u64,
}

pub struct Repricer {
    db: Database,
    trim_fraction: f64,
    items: Vec<TrackedItem>,
}

impl Repricer {
    pub fn new(db: Database, trim_fraction: f64, items: Vec<TrackedItem>) -> Self {
        Self {
            db,
            trim_fraction,
            items,
        }
    }

    /// Reprice every tracked item against the current market.
    pub async fn refresh_all(&self, source: &dyn ListingSource) -> Result<RefreshOutcome> {
        let key_rate = source.fetch_key_rate().await?;
        info!(%key_rate, items = self.items.len(), "Repricing at fresh key rate");

        let mut priced = 0u64;
        let mut skipped = 0u64;

        for item in &self.items {
            match self.reprice_item(source, item, key_rate).await {
                Ok(Some(quote)) => {
                    info!(item = %item.name, %quote, "Price updated");
                    priced += 1;
                }
                Ok(None) => {
                    skipped += 1;
                }
                Err(e) => {
                    warn!(item = %item.name, error = %e, "Repricing failed");
                    skipped += 1;
                }
            }
        }

        Ok(RefreshOutcome {
            key_rate,
            items_priced: priced,
            items_skipped: skipped,
        })
    }

    /// Quote one item, or `None` when the market data is too thin.
    async fn reprice_item(
        &self,
        source: &dyn ListingSource,
        item: &TrackedItem,
        key_rate: Decimal,
    ) -> Result<Option<Quote>> {
        let sells = self
            .sampled(source, &item.name, Intent::Sell, key_rate)
            .await?;
        let buys = self
            .sampled(source, &item.name, Intent::Buy, key_rate)
            .await?;

        if sells.is_empty() || buys.is_empty() {
            debug!(
                item = %item.name,
                sells = sells.len(),
                buys = buys.len(),
                "No samples survived trimming, skipping"
            );
            return Ok(None);
        }

        let quote = pricing::compute_quote(&sells, &buys, item.cost_floor_scrap)?;

        self.db
            .upsert_price(&PriceRecord {
                item_name: item.name.clone(),
                buy_scrap: quote.buy_scrap,
                sell_scrap: quote.sell_scrap,
                key_rate,
                updated_at: Utc::now(),
            })
            .await?;

        Ok(Some(quote))
    }

    /// Fetch, convert, and trim one side of the book.
    async fn sampled(
        &self,
        source: &dyn ListingSource,
        item: &str,
        intent: Intent,
        key_rate: Decimal,
    ) -> Result<Vec<i64>> {
        let raw = source.fetch_listings(item, intent).await?;
        let samples: Vec<i64> = raw
            .iter()
            .filter(|l| !l.is_priced_on_extras())
            .map(|l| l.to_scrap(key_rate))
            .filter(|&s| s > 0)
            .collect();
        Ok(pricing::trim_outliers(samples, self.trim_fraction)?)
    }
}
