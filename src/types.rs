//! Shared types for the relist bot.
//!
//! These types form the data model used across all modules.
//! They are kept dependency-light so that the pricing core, backpack
//! clients, and engine can depend on them without circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// Listing intent, named from the perspective of the listing's owner.
///
/// A `Buy` listing is an offer to buy the item; a `Sell` listing is an
/// offer to sell it. The wire value matches the backpack.tf `intent`
/// query parameter (0 = buy, 1 = sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Buy,
    Sell,
}

impl Intent {
    /// Wire value for the backpack.tf API.
    pub fn as_param(&self) -> u8 {
        match self {
            Intent::Buy => 0,
            Intent::Sell => 1,
        }
    }

    /// Parse a stored wire value back into an intent.
    pub fn from_param(value: i64) -> Option<Self> {
        match value {
            0 => Some(Intent::Buy),
            1 => Some(Intent::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Buy => write!(f, "buy"),
            Intent::Sell => write!(f, "sell"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cycle report
// ---------------------------------------------------------------------------

/// Summary of a single poll→reprice→sync cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub timestamp: DateTime<Utc>,
    /// Key exchange rate used for this cycle, in refined per key.
    pub key_rate: Decimal,
    pub items_priced: u64,
    pub items_skipped: u64,
    pub listings_published: u64,
    pub listings_failed: u64,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle #{}: rate={} ref/key priced={} skipped={} published={} failed={}",
            self.cycle_number,
            self.key_rate,
            self.items_priced,
            self.items_skipped,
            self.listings_published,
            self.listings_failed,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for relist.
///
/// Pricing-core conditions are detected synchronously at the offending
/// call and surfaced to the immediate caller; nothing is retried
/// internally. The calling layer decides whether to skip an item, log,
/// or abort a cycle.
#[derive(Debug, thiserror::Error)]
pub enum RelistError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("division by zero: derived scrap-per-key is zero")]
    DivisionByZero,

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
