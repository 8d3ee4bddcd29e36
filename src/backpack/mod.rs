//! backpack.tf integration.
//!
//! Three endpoints are used:
//! - `IGetClassifieds/v1` — observed listings per item and intent
//! - `IGetPrices/v4` — community guide prices (key-rate source)
//! - `ISetClassifieds/v1` — create or update our own listings
//!
//! The engine talks to the traits defined here (`ListingSource`,
//! `ListingPublisher`) so integration tests can swap in deterministic
//! in-memory implementations.

pub mod classifieds;
pub mod guide;
pub mod publisher;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::warn;

use crate::currency::{self, CurrencyBreakdown};
use crate::types::Intent;

pub(crate) const BASE_URL: &str = "https://backpack.tf/api";
const USER_AGENT: &str = "relist/0.1.0 (classifieds repricer)";

/// Item name of the key whose sell listings define the exchange rate.
pub const KEY_ITEM_NAME: &str = "Mann Co. Supply Crate Key";

// ---------------------------------------------------------------------------
// Raw listings
// ---------------------------------------------------------------------------

/// One observed classified listing, before currency conversion.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub keys: i64,
    /// Metal component in refined (e.g. 8.66).
    pub metal: Decimal,
    pub details: String,
}

impl RawListing {
    /// Total price in scrap at the given refined-per-key rate.
    pub fn to_scrap(&self, ref_per_key: Decimal) -> i64 {
        currency::to_scrap(
            &CurrencyBreakdown {
                keys: self.keys,
                refined: 0,
                reclaimed: 0,
                scrap: currency::refined_to_scrap(self.metal),
            },
            ref_per_key,
        )
    }

    /// Listings advertising spells or unusual effects price the extras,
    /// not the item itself, and would poison the sample set.
    pub fn is_priced_on_extras(&self) -> bool {
        let details = self.details.to_lowercase();
        details.contains("spell") || details.contains("effect")
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Read side of the marketplace: listings and the key exchange rate.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch raw classified listings for one item and intent.
    async fn fetch_listings(&self, item: &str, intent: Intent) -> Result<Vec<RawListing>>;

    /// A freshly fetched refined-per-key exchange rate. Callers must not
    /// cache this across cycles — the rate drifts with the market.
    async fn fetch_key_rate(&self) -> Result<Decimal>;
}

/// Request to create or update one of our own classifieds.
#[derive(Debug, Clone)]
pub struct ListingUpsert {
    pub item_name: String,
    pub intent: Intent,
    pub price_keys: i64,
    /// Metal component in display refined (e.g. 5.55).
    pub price_metal: Decimal,
    pub details: String,
    /// Existing listing id to update in place, if we have one.
    pub listing_id: Option<String>,
}

/// Write side of the marketplace.
#[async_trait]
pub trait ListingPublisher: Send + Sync {
    /// Publish the listing; returns the listing id assigned by the
    /// platform.
    async fn publish(&self, req: &ListingUpsert) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// backpack.tf API client.
pub struct BackpackClient {
    http: reqwest::Client,
    api_key: String,
}

impl BackpackClient {
    pub fn new(api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for backpack.tf")?;
        Ok(Self { http, api_key })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}

#[async_trait]
impl ListingSource for BackpackClient {
    async fn fetch_listings(&self, item: &str, intent: Intent) -> Result<Vec<RawListing>> {
        self.get_classifieds(item, intent).await
    }

    async fn fetch_key_rate(&self) -> Result<Decimal> {
        match self.fetch_guide_key_rate().await {
            Ok(rate) if rate > Decimal::ZERO => Ok(rate),
            Ok(rate) => {
                warn!(%rate, "Guide key price not positive, deriving rate from listings");
                self.key_rate_from_listings().await
            }
            Err(e) => {
                warn!(error = %e, "Guide price unavailable, deriving rate from listings");
                self.key_rate_from_listings().await
            }
        }
    }
}
