//! `ISetClassifieds/v1` — publishing our own listings.
//!
//! The endpoint takes a multipart form; passing an existing `listing_id`
//! updates that listing in place instead of creating a new one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::{BackpackClient, ListingPublisher, ListingUpsert, BASE_URL};

#[derive(Debug, Deserialize)]
struct SetEnvelope {
    response: SetResponse,
}

#[derive(Debug, Deserialize)]
struct SetResponse {
    listing: ListingRef,
}

#[derive(Debug, Deserialize)]
struct ListingRef {
    id: i64,
}

#[async_trait]
impl ListingPublisher for BackpackClient {
    async fn publish(&self, req: &ListingUpsert) -> Result<String> {
        let mut form = reqwest::multipart::Form::new()
            .text("key", self.api_key().to_string())
            .text("intent", req.intent.as_param().to_string())
            .text("item_name", req.item_name.clone())
            .text("price_keys", req.price_keys.to_string())
            .text("price_metal", req.price_metal.to_string())
            .text("details", req.details.clone());

        if let Some(id) = &req.listing_id {
            form = form.text("listing_id", id.clone());
        }

        let resp = self
            .http()
            .post(format!("{BASE_URL}/ISetClassifieds/v1/"))
            .multipart(form)
            .send()
            .await
            .context("backpack.tf listing publish request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!(
                "backpack.tf publish error for {} ({}): {status}: {body}",
                req.item_name,
                req.intent,
            );
        }

        let envelope: SetEnvelope = resp
            .json()
            .await
            .context("Failed to parse listing publish response")?;
        let listing_id = envelope.response.listing.id.to_string();

        info!(
            item = %req.item_name,
            intent = %req.intent,
            listing_id = %listing_id,
            keys = req.price_keys,
            metal = %req.price_metal,
            "Listing synced"
        );
        Ok(listing_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_envelope_deserialization() {
        let json = r#"{ "response": { "listing": { "id": 4815162342 } } }"#;
        let envelope: SetEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.response.listing.id, 4815162342);
    }
}
