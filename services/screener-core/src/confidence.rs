//! Confidence scoring helpers
//!
//! All scores live on a 0 - 100 scale. A rule that fires starts at
//! [`BASE_CONFIDENCE`] and climbs linearly with how far its metric clears
//! the threshold, saturating at [`MAX_CONFIDENCE`] once the excess reaches
//! the rule's full-scale distance.

pub const BASE_CONFIDENCE: f64 = 50.0;
pub const MAX_CONFIDENCE: f64 = 100.0;

/// Clamp to [0, 100]; NaN maps to 0
pub fn clamp(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    confidence.clamp(0.0, MAX_CONFIDENCE)
}

/// Score a threshold breach. Monotonic non-decreasing in `excess`.
pub fn from_excess(excess: f64, full_scale: f64) -> f64 {
    if !excess.is_finite() || !full_scale.is_finite() || full_scale <= 0.0 {
        return BASE_CONFIDENCE;
    }
    let ratio = (excess / full_scale).clamp(0.0, 1.0);
    BASE_CONFIDENCE + (MAX_CONFIDENCE - BASE_CONFIDENCE) * ratio
}

/// Apply a family weight
pub fn weighted(confidence: f64, weight: f64) -> f64 {
    clamp(confidence * weight)
}

/// Combine agreeing scores as a probabilistic union.
///
/// One score returns itself; adding a score, or raising one, never
/// lowers the result. An empty input scores 0.
pub fn combine<I>(confidences: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let miss: f64 = confidences
        .into_iter()
        .map(|c| 1.0 - clamp(c) / MAX_CONFIDENCE)
        .product();
    clamp((1.0 - miss) * MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_excess_is_bounded_and_monotonic() {
        assert_eq!(from_excess(0.0, 10.0), 50.0);
        assert_eq!(from_excess(5.0, 10.0), 75.0);
        assert_eq!(from_excess(50.0, 10.0), 100.0);
        assert_eq!(from_excess(-1.0, 10.0), 50.0);

        let mut last = 0.0;
        for step in 0..40 {
            let c = from_excess(step as f64 * 0.5, 10.0);
            assert!(c >= last);
            assert!((0.0..=100.0).contains(&c));
            last = c;
        }
    }

    #[test]
    fn test_from_excess_degenerate_scale() {
        assert_eq!(from_excess(3.0, 0.0), BASE_CONFIDENCE);
        assert_eq!(from_excess(f64::NAN, 1.0), BASE_CONFIDENCE);
    }

    #[test]
    fn test_combine_single_is_identity() {
        assert!((combine([58.0]) - 58.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_grows_with_agreement() {
        let one = combine([60.0]);
        let two = combine([60.0, 50.0]);
        let stronger = combine([60.0, 70.0]);
        assert!(two > one);
        assert!(stronger > two);
        assert!((two - 80.0).abs() < 1e-9);
        assert_eq!(combine([100.0, 30.0]), 100.0);
        assert_eq!(combine(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_weighted_clamps() {
        assert_eq!(weighted(80.0, 2.0), 100.0);
        assert_eq!(weighted(80.0, 0.5), 40.0);
    }
}
