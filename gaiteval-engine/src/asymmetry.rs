//! Left/right asymmetry scoring
//!
//! Pure numeric comparison of a bilateral metric's two sides. Scoring is
//! deliberately independent of band classification; the recommendation
//! generator is the only consumer that thresholds these numbers.

use serde::Serialize;

/// Absolute and relative difference between left and right values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Asymmetry {
    pub absolute: f64,
    /// Relative difference in percent of the larger magnitude;
    /// 0 when both sides are 0
    pub percent: f64,
}

/// Score the asymmetry between two side values.
pub fn asymmetry(left: f64, right: f64) -> Asymmetry {
    let absolute = (left - right).abs();
    let reference = left.abs().max(right.abs());
    let percent = if reference == 0.0 {
        0.0
    } else {
        absolute / reference * 100.0
    };
    Asymmetry { absolute, percent }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_sides_score_zero() {
        for x in [0.0, 1.0, -3.5, 180.0] {
            let a = asymmetry(x, x);
            assert_eq!(a.absolute, 0.0);
            assert_eq!(a.percent, 0.0);
        }
    }

    #[test]
    fn symmetric_in_arguments() {
        let ab = asymmetry(8.0, 10.0);
        let ba = asymmetry(10.0, 8.0);
        assert_eq!(ab, ba);
    }

    #[test]
    fn percent_relative_to_larger_magnitude() {
        let a = asymmetry(8.0, 10.0);
        assert_eq!(a.absolute, 2.0);
        assert!((a.percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn both_zero_is_defined_as_zero() {
        let a = asymmetry(0.0, 0.0);
        assert_eq!(a.percent, 0.0);
    }

    #[test]
    fn one_sided_zero() {
        let a = asymmetry(0.0, 5.0);
        assert_eq!(a.absolute, 5.0);
        assert_eq!(a.percent, 100.0);
    }
}
