//! Currency unit conversion.
//!
//! TF2 metal denominations compose in fixed ratios: 1 refined = 3
//! reclaimed = 9 scrap. Keys float against refined at a market rate that
//! drifts over real-world trade, so the rate is supplied per call rather
//! than baked in as a constant. All pricing arithmetic happens in scrap,
//! the smallest unit.
//!
//! Rounding: `rate × 9` is rounded half-away-from-zero, and `from_scrap`
//! derives scrap-per-key the same way, so a breakdown always round-trips
//! exactly through `to_scrap` at the same rate.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::RelistError;

pub const SCRAP_PER_REFINED: i64 = 9;
pub const SCRAP_PER_RECLAIMED: i64 = 3;

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

/// A scrap total decomposed into denominations, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBreakdown {
    pub keys: i64,
    pub refined: i64,
    pub reclaimed: i64,
    pub scrap: i64,
}

impl CurrencyBreakdown {
    /// The non-key portion expressed as display metal, TF2 style
    /// (1 reclaimed = 0.33, 1 scrap = 0.11). This is the value the
    /// backpack.tf `price_metal` form field expects.
    pub fn metal(&self) -> Decimal {
        Decimal::from(self.refined)
            + Decimal::from(self.reclaimed) * dec!(0.33)
            + Decimal::from(self.scrap) * dec!(0.11)
    }
}

impl fmt::Display for CurrencyBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} keys, {} ref", self.keys, self.metal())
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Round a decimal to the nearest whole number, half away from zero,
/// widening to i64. Values outside i64 saturate towards their own sign.
fn round_to_i64(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(if value.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
}

/// Scrap value of one key at the given refined-per-key rate.
///
/// A rate of 0 makes keys worthless — degenerate but defined. Negative
/// rates clamp to 0.
pub fn scrap_per_key(ref_per_key: Decimal) -> i64 {
    round_to_i64(ref_per_key * Decimal::from(SCRAP_PER_REFINED)).max(0)
}

/// Convert a decimal refined-metal value (e.g. 8.66) to whole scrap.
pub fn refined_to_scrap(metal: Decimal) -> i64 {
    round_to_i64(metal * Decimal::from(SCRAP_PER_REFINED))
}

/// Flatten a breakdown into a total scrap count. Saturates on overflow.
pub fn to_scrap(amount: &CurrencyBreakdown, ref_per_key: Decimal) -> i64 {
    let per_key = scrap_per_key(ref_per_key);
    amount
        .keys
        .saturating_mul(per_key)
        .saturating_add(amount.refined.saturating_mul(SCRAP_PER_REFINED))
        .saturating_add(amount.reclaimed.saturating_mul(SCRAP_PER_RECLAIMED))
        .saturating_add(amount.scrap)
}

/// Decompose a scrap total greedily, largest denomination first.
///
/// The result is the unique decomposition with each remainder minimised:
/// the refined count stays below one key's worth, reclaimed below 3, and
/// scrap below 3.
///
/// Errors with [`RelistError::DivisionByZero`] when the derived
/// scrap-per-key is zero, and [`RelistError::InvalidArgument`] for
/// negative totals.
pub fn from_scrap(
    total_scrap: i64,
    ref_per_key: Decimal,
) -> Result<CurrencyBreakdown, RelistError> {
    if total_scrap < 0 {
        return Err(RelistError::InvalidArgument(format!(
            "negative scrap total: {total_scrap}"
        )));
    }
    let per_key = scrap_per_key(ref_per_key);
    if per_key == 0 {
        return Err(RelistError::DivisionByZero);
    }

    let keys = total_scrap / per_key;
    let rem = total_scrap % per_key;
    let refined = rem / SCRAP_PER_REFINED;
    let rem = rem % SCRAP_PER_REFINED;
    let reclaimed = rem / SCRAP_PER_RECLAIMED;
    let scrap = rem % SCRAP_PER_RECLAIMED;

    Ok(CurrencyBreakdown {
        keys,
        refined,
        reclaimed,
        scrap,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
