//! Undercut quoting.
//!
//! Turns a trimmed sample set's extremes into a bid/ask pair that beats
//! the current market by exactly one scrap, subject to a sell floor.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::RelistError;

/// A computed bid/ask pair in scrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub buy_scrap: i64,
    pub sell_scrap: i64,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buy {}s / sell {}s", self.buy_scrap, self.sell_scrap)
    }
}

/// Beat the best competing offers by one scrap.
///
/// The sell price undercuts the cheapest competing sell listing but never
/// drops below `cost_floor_scrap`; the buy price overbids the highest
/// competing buy listing with no floor and no upper clamp — extreme
/// market prices propagate as-is.
///
/// Both sample sets must be non-empty (post-trim); an empty side is
/// [`RelistError::InsufficientData`] and the caller skips the item
/// entirely rather than publishing a zero quote.
pub fn compute_quote(
    sell_samples: &[i64],
    buy_samples: &[i64],
    cost_floor_scrap: i64,
) -> Result<Quote, RelistError> {
    let min_sell = sell_samples
        .iter()
        .min()
        .copied()
        .ok_or_else(|| RelistError::InsufficientData("no sell samples".into()))?;
    let max_buy = buy_samples
        .iter()
        .max()
        .copied()
        .ok_or_else(|| RelistError::InsufficientData("no buy samples".into()))?;

    // Samples can arrive saturated at i64::MAX (a manipulated listing
    // with an absurd key count); the one-scrap step must not wrap.
    Ok(Quote {
        buy_scrap: max_buy.saturating_add(1),
        sell_scrap: min_sell.saturating_sub(1).max(cost_floor_scrap),
    })
}
