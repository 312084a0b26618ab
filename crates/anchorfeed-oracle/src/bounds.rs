//! Reporter-versus-anchor ratio bounds.
//!
//! Bounds are derived once from a tolerance parameter and shared by every
//! asset. Acceptance is a fixed-point ratio test, inclusive at both ends.

use anchorfeed_math::scale::mul_div;
use anchorfeed_math::MathError;
use anchorfeed_types::RATIO_SCALE;

use crate::Result;

/// Precomputed acceptance band around the anchor price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorBounds {
    upper: u128,
    lower: u128,
}

impl AnchorBounds {
    /// Derive bounds from a fractional tolerance at the 1e18 denominator.
    ///
    /// The upper bound saturates at the numeric maximum and the lower bound
    /// at 1, so extreme tolerances widen the band instead of wrapping.
    pub fn from_tolerance(tolerance: u128) -> Self {
        let upper = RATIO_SCALE.saturating_add(tolerance);
        let lower = if tolerance < RATIO_SCALE {
            RATIO_SCALE - tolerance
        } else {
            1
        };
        Self { upper, lower }
    }

    pub fn upper(&self) -> u128 {
        self.upper
    }

    pub fn lower(&self) -> u128 {
        self.lower
    }

    /// Whether `reported` lies within the band around `anchor`.
    ///
    /// Zero reported prices never pass, before any ratio arithmetic. A
    /// ratio too large for the result type only passes when the upper
    /// bound itself is saturated.
    pub fn within(&self, reported: u128, anchor: u128) -> Result<bool> {
        if reported == 0 {
            return Ok(false);
        }
        match mul_div(reported, RATIO_SCALE, anchor) {
            Ok(ratio) => Ok(self.lower <= ratio && ratio <= self.upper),
            Err(MathError::Overflow) => Ok(self.upper == u128::MAX),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: u128 = 1_000_000_000_000_000_000_000; // 1e21
    const TEN_PERCENT: u128 = 100_000_000_000_000_000;

    #[test]
    fn test_band_endpoints() {
        let bounds = AnchorBounds::from_tolerance(TEN_PERCENT);
        assert_eq!(bounds.upper(), 1_100_000_000_000_000_000);
        assert_eq!(bounds.lower(), 900_000_000_000_000_000);
    }

    #[test]
    fn test_within_band_accepted() {
        let bounds = AnchorBounds::from_tolerance(TEN_PERCENT);
        assert!(bounds.within(ANCHOR, ANCHOR).expect("exact"));
        assert!(bounds.within(ANCHOR / 100 * 105, ANCHOR).expect("1.05x"));
        assert!(bounds.within(ANCHOR / 100 * 95, ANCHOR).expect("0.95x"));
    }

    #[test]
    fn test_outside_band_rejected() {
        let bounds = AnchorBounds::from_tolerance(TEN_PERCENT);
        assert!(!bounds.within(ANCHOR / 100 * 111, ANCHOR).expect("1.11x"));
        assert!(!bounds.within(ANCHOR / 100 * 89, ANCHOR).expect("0.89x"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = AnchorBounds::from_tolerance(TEN_PERCENT);
        // Exactly 1.10x passes, one part in 1e8 above it does not.
        assert!(bounds.within(ANCHOR / 100 * 110, ANCHOR).expect("1.10x"));
        let just_above = ANCHOR / 100 * 110 + ANCHOR / 100_000_000;
        assert!(!bounds.within(just_above, ANCHOR).expect("1.10000001x"));
        // Exactly 0.90x passes too.
        assert!(bounds.within(ANCHOR / 100 * 90, ANCHOR).expect("0.90x"));
    }

    #[test]
    fn test_zero_reported_never_passes() {
        let bounds = AnchorBounds::from_tolerance(u128::MAX);
        assert!(!bounds.within(0, ANCHOR).expect("zero"));
    }

    #[test]
    fn test_full_tolerance_saturates_lower_bound() {
        let bounds = AnchorBounds::from_tolerance(RATIO_SCALE);
        assert_eq!(bounds.upper(), 2_000_000_000_000_000_000);
        assert_eq!(bounds.lower(), 1);
        // A price 1e18 times smaller than the anchor still clears the
        // saturated lower bound of 1.
        assert!(bounds.within(ANCHOR / RATIO_SCALE, ANCHOR).expect("tiny"));
        // A ratio that truncates to zero does not.
        assert!(!bounds.within(1, ANCHOR).expect("below resolution"));
    }

    #[test]
    fn test_extreme_tolerance_saturates_upper_bound() {
        let bounds = AnchorBounds::from_tolerance(u128::MAX);
        assert_eq!(bounds.upper(), u128::MAX);
        assert_eq!(bounds.lower(), 1);
        // Even a ratio beyond the result type passes the saturated band.
        assert!(bounds.within(u128::MAX, 1).expect("huge"));
    }

    #[test]
    fn test_zero_anchor_is_fatal() {
        let bounds = AnchorBounds::from_tolerance(TEN_PERCENT);
        assert!(bounds.within(ANCHOR, 0).is_err());
    }
}
