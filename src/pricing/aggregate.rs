//! Sample aggregation.

use rust_decimal::Decimal;

/// Median of a sample set.
///
/// Sorts an internal copy, so input order does not matter. Returns `None`
/// for an empty set — an explicit no-data signal, deliberately not a zero
/// sentinel, since 0 is also a syntactically valid price. Even-sized sets
/// average the two middle values at full decimal precision.
pub fn median(samples: &[i64]) -> Option<Decimal> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    let value = if sorted.len() % 2 == 1 {
        Decimal::from(sorted[mid])
    } else {
        (Decimal::from(sorted[mid - 1]) + Decimal::from(sorted[mid])) / Decimal::from(2)
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[1, 3, 5]), Some(dec!(3)));
        assert_eq!(median(&[42]), Some(dec!(42)));
    }

    #[test]
    fn test_median_even_averages_middle_pair() {
        assert_eq!(median(&[1, 3, 5, 7]), Some(dec!(4)));
        // Non-integer midpoints are preserved, not truncated.
        assert_eq!(median(&[1, 2]), Some(dec!(1.5)));
    }

    #[test]
    fn test_median_empty_is_none() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_ignores_input_order() {
        assert_eq!(median(&[5, 1, 3]), Some(dec!(3)));
        assert_eq!(median(&[7, 1, 5, 3]), Some(dec!(4)));
    }
}
