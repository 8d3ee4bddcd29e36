//! `IGetPrices/v4` — community guide prices.
//!
//! Used for the key exchange rate: the guide "sell" value for the key, in
//! refined metal. When the guide is unavailable the rate falls back to
//! the median of live key sell listings.

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use super::{BackpackClient, BASE_URL, KEY_ITEM_NAME};
use crate::currency::{self, SCRAP_PER_REFINED};
use crate::pricing;
use crate::types::Intent;

#[derive(Debug, Deserialize)]
struct PricesEnvelope {
    response: PricesResponse,
}

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    prices: HashMap<String, GuidePrice>,
}

#[derive(Debug, Deserialize, Default)]
struct GuidePrice {
    #[serde(default)]
    sell: Option<GuidePoint>,
}

#[derive(Debug, Deserialize, Default)]
struct GuidePoint {
    #[serde(default)]
    value: Decimal,
}

impl BackpackClient {
    /// Key sell guide price in refined metal (e.g. 67.55).
    pub(crate) async fn fetch_guide_key_rate(&self) -> Result<Decimal> {
        let url = format!(
            "{BASE_URL}/IGetPrices/v4?key={}&currency=metal",
            self.api_key()
        );

        debug!("Fetching guide prices");

        let resp = self
            .http()
            .get(&url)
            .send()
            .await
            .context("backpack.tf guide price request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("backpack.tf guide price error {status}: {body}");
        }

        let envelope: PricesEnvelope = resp
            .json()
            .await
            .context("Failed to parse guide price response")?;

        let rate = envelope
            .response
            .prices
            .get(KEY_ITEM_NAME)
            .and_then(|p| p.sell.as_ref())
            .map(|s| s.value)
            .ok_or_else(|| anyhow!("Guide price for {KEY_ITEM_NAME:?} not found"))?;

        debug!(%rate, "Guide key rate fetched");
        Ok(rate)
    }

    /// Fallback rate: median of live key sell listings, in refined.
    ///
    /// Keys listed for keys (or for spelled items) are noise; only pure
    /// metal listings count.
    pub(crate) async fn key_rate_from_listings(&self) -> Result<Decimal> {
        let sells = self.get_classifieds(KEY_ITEM_NAME, Intent::Sell).await?;

        let samples: Vec<i64> = sells
            .iter()
            .filter(|l| l.keys == 0 && !l.is_priced_on_extras())
            .map(|l| currency::refined_to_scrap(l.metal))
            .filter(|&s| s > 0)
            .collect();

        let median_scrap = pricing::median(&samples)
            .ok_or_else(|| anyhow!("No key sell listings to derive a rate from"))?;

        Ok((median_scrap / Decimal::from(SCRAP_PER_REFINED)).round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_guide_envelope_deserialization() {
        let json = r#"{
            "response": {
                "prices": {
                    "Mann Co. Supply Crate Key": {
                        "sell": { "value": 67.55 },
                        "buy": { "value": 67.11 }
                    },
                    "Tour of Duty Ticket": {}
                }
            }
        }"#;
        let envelope: PricesEnvelope = serde_json::from_str(json).unwrap();
        let key = envelope.response.prices.get(KEY_ITEM_NAME).unwrap();
        assert_eq!(key.sell.as_ref().unwrap().value, dec!(67.55));
        let ticket = envelope.response.prices.get("Tour of Duty Ticket").unwrap();
        assert!(ticket.sell.is_none());
    }
}
