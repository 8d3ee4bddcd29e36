//! Outlier trimming for listing price samples.
//!
//! Manipulated or mistaken listings show up as extreme values; dropping a
//! fraction of each tail before aggregation keeps them from steering the
//! quote.

use crate::types::RelistError;

/// Drop `floor(len × fraction)` samples from each tail after sorting
/// ascending.
///
/// `fraction` must lie in `[0, 0.5)`; anything else (including NaN) is an
/// [`RelistError::InvalidArgument`]. When the drop consumes the whole set
/// the result clamps to empty rather than erroring — callers handle "no
/// data survived trimming" explicitly.
///
/// Output depends only on the input multiset, not its ordering.
pub fn trim_outliers(mut samples: Vec<i64>, fraction: f64) -> Result<Vec<i64>, RelistError> {
    if !(0.0..0.5).contains(&fraction) {
        return Err(RelistError::InvalidArgument(format!(
            "trim fraction must be in [0, 0.5), got {fraction}"
        )));
    }

    samples.sort_unstable();
    let drop = (samples.len() as f64 * fraction).floor() as usize;
    if samples.len() <= 2 * drop {
        return Ok(Vec::new());
    }
    samples.truncate(samples.len() - drop);
    samples.drain(..drop);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_both_tails() {
        // count 5, drop = floor(5 * 0.2) = 1 → middle three, sorted
        let trimmed = trim_outliers(vec![5, 1, 9, 3, 7], 0.2).unwrap();
        assert_eq!(trimmed, vec![3, 5, 7]);
    }

    #[test]
    fn test_drop_rounds_down_to_zero() {
        // floor(2 * 0.4) = 0 → unchanged (but sorted)
        let trimmed = trim_outliers(vec![2, 1], 0.4).unwrap();
        assert_eq!(trimmed, vec![1, 2]);
    }

    #[test]
    fn test_degenerate_sets_clamp_to_empty() {
        // Empty input stays empty, never panics or wraps.
        let trimmed = trim_outliers(Vec::new(), 0.25).unwrap();
        assert!(trimmed.is_empty());

        // Just under the cap: drop still rounds down, nothing vanishes.
        let trimmed = trim_outliers(vec![10, 20], 0.499).unwrap();
        assert_eq!(trimmed, vec![10, 20]); // drop = floor(0.998) = 0
    }

    #[test]
    fn test_whole_set_consumed_is_valid() {
        // count 3, fraction 0.34 → drop = 1, keeps 1
        let trimmed = trim_outliers(vec![3, 1, 2], 0.34).unwrap();
        assert_eq!(trimmed, vec![2]);
    }

    #[test]
    fn test_order_independence() {
        let a = trim_outliers(vec![9, 1, 5, 3, 7, 2, 8, 4, 6, 10], 0.2).unwrap();
        let b = trim_outliers(vec![10, 2, 4, 6, 8, 1, 3, 5, 7, 9], 0.2).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, vec![3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_rejects_fraction_out_of_range() {
        assert!(matches!(
            trim_outliers(vec![1, 2, 3], 0.5),
            Err(RelistError::InvalidArgument(_))
        ));
        assert!(matches!(
            trim_outliers(vec![1, 2, 3], -0.1),
            Err(RelistError::InvalidArgument(_))
        ));
        assert!(matches!(
            trim_outliers(vec![1, 2, 3], f64::NAN),
            Err(RelistError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_fraction_just_sorts() {
        let trimmed = trim_outliers(vec![3, 1, 2], 0.0).unwrap();
        assert_eq!(trimmed, vec![1, 2, 3]);
    }
}
