//! `IGetClassifieds/v1` — observed listings for one item.
//!
//! Only the fields the pricing pipeline needs are deserialized; the
//! endpoint returns a lot more per listing.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{BackpackClient, RawListing, BASE_URL};
use crate::types::Intent;

#[derive(Debug, Deserialize)]
struct ClassifiedsEnvelope {
    response: ClassifiedsResponse,
}

#[derive(Debug, Deserialize, Default)]
struct ClassifiedsResponse {
    #[serde(default)]
    classifieds: Vec<Classified>,
}

#[derive(Debug, Deserialize)]
struct Classified {
    #[serde(default)]
    currencies: Currencies,
    #[serde(default)]
    details: String,
}

#[derive(Debug, Deserialize, Default)]
struct Currencies {
    #[serde(default)]
    keys: i64,
    #[serde(default)]
    metal: Decimal,
}

impl BackpackClient {
    /// Fetch the classified listings for `item` with the given intent.
    pub(crate) async fn get_classifieds(
        &self,
        item: &str,
        intent: Intent,
    ) -> Result<Vec<RawListing>> {
        let url = format!(
            "{BASE_URL}/IGetClassifieds/v1?key={}&intent={}&item_name={}",
            self.api_key(),
            intent.as_param(),
            urlencoding::encode(item),
        );

        debug!(item, %intent, "Fetching classifieds");

        let resp = self
            .http()
            .get(&url)
            .send()
            .await
            .context("backpack.tf classifieds request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("backpack.tf classifieds error {status}: {body}");
        }

        let envelope: ClassifiedsEnvelope = resp
            .json()
            .await
            .context("Failed to parse classifieds response")?;

        let listings: Vec<RawListing> = envelope
            .response
            .classifieds
            .into_iter()
            .map(|c| RawListing {
                keys: c.currencies.keys,
                metal: c.currencies.metal,
                details: c.details,
            })
            .collect();

        debug!(item, %intent, count = listings.len(), "Classifieds fetched");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_envelope_deserialization() {
        let json = r#"{
            "response": {
                "classifieds": [
                    { "currencies": { "keys": 1, "metal": 8.66 }, "details": "quick" },
                    { "currencies": { "metal": 2.33 } },
                    { "currencies": {} }
                ]
            }
        }"#;
        let envelope: ClassifiedsEnvelope = serde_json::from_str(json).unwrap();
        let listings = envelope.response.classifieds;
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].currencies.keys, 1);
        assert_eq!(listings[0].currencies.metal, dec!(8.66));
        assert_eq!(listings[0].details, "quick");
        assert_eq!(listings[1].currencies.keys, 0);
        assert_eq!(listings[2].currencies.metal, Decimal::ZERO);
    }

    #[test]
    fn test_empty_response() {
        let json = r#"{ "response": {} }"#;
        let envelope: ClassifiedsEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.response.classifieds.is_empty());
    }
}
