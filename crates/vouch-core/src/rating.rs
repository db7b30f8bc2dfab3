//! Rating aggregation.

use std::collections::BTreeMap;

/// Compute the overall score from per-criterion ratings.
///
/// Returns `0.0` for an empty map, otherwise the arithmetic mean rounded
/// to one decimal place, **half-up** (`f64::round` is half-away-from-zero,
/// which is half-up for the non-negative means this domain produces). The
/// rounding rule is observable in stored data, so it is fixed here.
///
/// Pure: the result depends only on the values, never on key order. Range
/// checks happen in the lifecycle validation, not here.
pub fn aggregate(ratings: &BTreeMap<String, f64>) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.values().sum();
    let mean = sum / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(aggregate(&BTreeMap::new()), 0.0);
    }

    #[test]
    fn test_plain_mean() {
        assert_eq!(aggregate(&map(&[("quality", 5.0), ("reliability", 3.0)])), 4.0);
    }

    #[test]
    fn test_half_rounds_up() {
        // mean is exactly 4.25 → 4.3 under half-up
        assert_eq!(aggregate(&map(&[("a", 4.26), ("b", 4.24)])), 4.3);
    }

    #[test]
    fn test_single_criterion() {
        assert_eq!(aggregate(&map(&[("quality", 4.0)])), 4.0);
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let forward = map(&[("a", 2.0), ("b", 3.0), ("c", 5.0)]);
        let reversed = map(&[("c", 5.0), ("b", 3.0), ("a", 2.0)]);
        assert_eq!(aggregate(&forward), aggregate(&reversed));
    }
}
