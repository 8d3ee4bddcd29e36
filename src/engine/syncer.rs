//! Listing synchronisation.
//!
//! Takes the stored quotes and republishes our classifieds at those
//! prices, reusing existing listing ids so backpack.tf updates in place
//! instead of bumping a new listing. In dry-run mode nothing is posted;
//! the would-be listings are logged and recorded with fabricated ids.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::backpack::{ListingPublisher, ListingUpsert};
use crate::currency;
use crate::storage::{Database, ListingRecord, PriceRecord};
use crate::types::Intent;

/// Counts from one sync pass.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub published: u64,
    pub failed: u64,
}

pub struct Syncer {
    db: Database,
    dry_run: bool,
}

impl Syncer {
    pub fn new(db: Database, dry_run: bool) -> Self {
        Self { db, dry_run }
    }

    /// Republish both sides of every stored quote.
    pub async fn sync_all(&self, publisher: &dyn ListingPublisher) -> Result<SyncOutcome> {
        let prices = self.db.all_prices().await?;
        let mut published = 0u64;
        let mut failed = 0u64;

        for price in &prices {
            for (intent, scrap) in [
                (Intent::Buy, price.buy_scrap),
                (Intent::Sell, price.sell_scrap),
            ] {
                match self.sync_listing(publisher, price, intent, scrap).await {
                    Ok(()) => published += 1,
                    Err(e) => {
                        warn!(
                            item = %price.item_name,
                            %intent,
                            error = %e,
                            "Listing sync failed"
                        );
                        failed += 1;
                    }
                }
            }
        }

        Ok(SyncOutcome { published, failed })
    }

    async fn sync_listing(
        &self,
        publisher: &dyn ListingPublisher,
        price: &PriceRecord,
        intent: Intent,
        price_scrap: i64,
    ) -> Result<()> {
        // Decompose at the same rate the quote was computed with.
        let breakdown = currency::from_scrap(price_scrap, price.key_rate)?;

        let existing = self.db.find_listing(&price.item_name, intent).await?;
        let req = ListingUpsert {
            item_name: price.item_name.clone(),
            intent,
            price_keys: breakdown.keys,
            price_metal: breakdown.metal(),
            // The trade offer command is the opposite of our intent: on a
            // buy listing the other party sells to us.
            details: match intent {
                Intent::Buy => format!("Type !sell {}", price.item_name),
                Intent::Sell => format!("Type !buy {}", price.item_name),
            },
            listing_id: existing
                .as_ref()
                .filter(|r| r.active)
                .map(|r| r.listing_id.clone()),
        };

        let listing_id = if self.dry_run {
            info!(
                item = %req.item_name,
                %intent,
                keys = req.price_keys,
                metal = %req.price_metal,
                "[DRY RUN] Would publish listing"
            );
            format!("dry-run-{}", uuid::Uuid::new_v4())
        } else {
            publisher.publish(&req).await?
        };

        self.db
            .upsert_listing(&ListingRecord {
                item_name: price.item_name.clone(),
                intent,
                listing_id,
                price_scrap,
                updated_at: Utc::now(),
                active: true,
            })
            .await?;
        Ok(())
    }
}
