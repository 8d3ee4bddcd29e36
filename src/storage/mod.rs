//! Persistence layer.
//!
//! A local SQLite database holds the latest computed price per item and
//! the state of our published classifieds. Both tables are upsert-only;
//! the schema is created on connect so a fresh checkout works with no
//! migration step.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

use crate::types::{Intent, RelistError};

const MAX_CONNECTIONS: u32 = 5;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Latest computed quote for one tracked item.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub item_name: String,
    pub buy_scrap: i64,
    pub sell_scrap: i64,
    /// Key rate the quote was computed at, in refined per key. Needed to
    /// decompose the scrap prices back into keys + metal when publishing.
    pub key_rate: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// State of one of our published classifieds.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub item_name: String,
    pub intent: Intent,
    pub listing_id: String,
    pub price_scrap: i64,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// Handle to the embedded database. Cheap to clone — wraps a pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `url` and ensure the
    /// schema exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {url}"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {url}"))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(url, "Database ready");
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS prices (
                item_name   TEXT PRIMARY KEY,
                buy_scrap   INTEGER NOT NULL,
                sell_scrap  INTEGER NOT NULL,
                key_rate    TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create prices table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                item_name   TEXT NOT NULL,
                intent      INTEGER NOT NULL,
                listing_id  TEXT NOT NULL,
                price_scrap INTEGER NOT NULL,
                updated_at  TEXT NOT NULL,
                active      INTEGER NOT NULL,
                PRIMARY KEY (item_name, intent)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create listings table")?;

        Ok(())
    }

    // -- Prices ----------------------------------------------------------

    pub async fn upsert_price(&self, record: &PriceRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO prices (item_name, buy_scrap, sell_scrap, key_rate, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (item_name) DO UPDATE SET
                buy_scrap = excluded.buy_scrap,
                sell_scrap = excluded.sell_scrap,
                key_rate = excluded.key_rate,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.item_name)
        .bind(record.buy_scrap)
        .bind(record.sell_scrap)
        .bind(record.key_rate.to_string())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert price for {}", record.item_name))?;
        Ok(())
    }

    pub async fn get_price(&self, item_name: &str) -> Result<Option<PriceRecord>> {
        let row = sqlx::query("SELECT * FROM prices WHERE item_name = ?1")
            .bind(item_name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch price record")?;
        row.map(|r| price_from_row(&r)).transpose()
    }

    pub async fn all_prices(&self) -> Result<Vec<PriceRecord>> {
        let rows = sqlx::query("SELECT * FROM prices ORDER BY item_name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch price records")?;
        rows.iter().map(price_from_row).collect()
    }

    // -- Listings --------------------------------------------------------

    pub async fn upsert_listing(&self, record: &ListingRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO listings (item_name, intent, listing_id, price_scrap, updated_at, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (item_name, intent) DO UPDATE SET
                listing_id = excluded.listing_id,
                price_scrap = excluded.price_scrap,
                updated_at = excluded.updated_at,
                active = excluded.active
            "#,
        )
        .bind(&record.item_name)
        .bind(record.intent.as_param() as i64)
        .bind(&record.listing_id)
        .bind(record.price_scrap)
        .bind(record.updated_at)
        .bind(record.active)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert listing for {}", record.item_name))?;
        Ok(())
    }

    pub async fn find_listing(
        &self,
        item_name: &str,
        intent: Intent,
    ) -> Result<Option<ListingRecord>> {
        let row = sqlx::query("SELECT * FROM listings WHERE item_name = ?1 AND intent = ?2")
            .bind(item_name)
            .bind(intent.as_param() as i64)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch listing record")?;
        row.map(|r| listing_from_row(&r)).transpose()
    }

    /// Deactivate listings and drop prices for items no longer tracked.
    /// Returns the number of listings deactivated.
    pub async fn prune_untracked(&self, tracked: &[String]) -> Result<u64> {
        // SQLite has no array binds; a small IN list built from
        // placeholders covers realistic tracked-item counts.
        let placeholders = std::iter::repeat("?")
            .take(tracked.len().max(1))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "UPDATE listings SET active = 0 WHERE active = 1 AND item_name NOT IN ({placeholders})"
        );
        let mut query = sqlx::query(&sql);
        for item in tracked {
            query = query.bind(item);
        }
        if tracked.is_empty() {
            query = query.bind("");
        }
        let deactivated = query
            .execute(&self.pool)
            .await
            .context("Failed to deactivate untracked listings")?
            .rows_affected();

        let sql = format!("DELETE FROM prices WHERE item_name NOT IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for item in tracked {
            query = query.bind(item);
        }
        if tracked.is_empty() {
            query = query.bind("");
        }
        query
            .execute(&self.pool)
            .await
            .context("Failed to drop untracked prices")?;

        Ok(deactivated)
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

// Decimal is stored as TEXT (sqlx's sqlite driver has no native decimal
// type) and intent as its wire integer; both are validated on read.

fn price_from_row(row: &SqliteRow) -> Result<PriceRecord> {
    let key_rate: String = row.try_get("key_rate")?;
    let key_rate = Decimal::from_str(&key_rate)
        .map_err(|e| RelistError::Storage(format!("bad key_rate {key_rate:?}: {e}")))?;
    Ok(PriceRecord {
        item_name: row.try_get("item_name")?,
        buy_scrap: row.try_get("buy_scrap")?,
        sell_scrap: row.try_get("sell_scrap")?,
        key_rate,
        updated_at: row.try_get("updated_at")?,
    })
}

fn listing_from_row(row: &SqliteRow) -> Result<ListingRecord> {
    let intent: i64 = row.try_get("intent")?;
    let intent = Intent::from_param(intent)
        .ok_or_else(|| RelistError::Storage(format!("bad intent value {intent}")))?;
    Ok(ListingRecord {
        item_name: row.try_get("item_name")?,
        intent,
        listing_id: row.try_get("listing_id")?,
        price_scrap: row.try_get("price_scrap")?,
        updated_at: row.try_get("updated_at")?,
        active: row.try_get("active")?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
