//! Cross-camera-angle value resolver
//!
//! Reconciles up to four per-angle result sets into a single value per
//! metric and side. A camera recording a runner moving left-to-right
//! captures the runner's right side most clearly, and vice versa, so
//! each side prefers its facing angle and falls back to the primary
//! `normal` recording.
//!
//! Pure selection over already-fetched data: no I/O, no retries, and
//! absence is signalled with `None`, never an error or a coerced zero.
//! Resolved values are computed on demand and never cached, because the
//! set of available angles grows as recordings finish processing.

use std::collections::HashMap;

use serde::Serialize;

use gaiteval_common::{CameraAngle, ResultSet, Side};

use crate::registry::MetricRegistry;

/// The value chosen for one metric/side after angle fallback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedValue {
    /// Full metric key as found in the source result set
    pub key: String,
    /// `None` for side-agnostic metrics
    pub side: Option<Side>,
    pub value: f64,
    /// Angle whose result set supplied the value
    pub source_angle: CameraAngle,
}

/// Angle precedence for a bilateral metric on the given side
fn precedence(side: Side) -> [CameraAngle; 2] {
    match side {
        Side::Left => [CameraAngle::RightToLeft, CameraAngle::Normal],
        Side::Right => [CameraAngle::LeftToRight, CameraAngle::Normal],
    }
}

/// Resolve the best available value for `(base_key, side)` from the
/// session's result sets.
///
/// Side-agnostic metrics resolve from the `normal` angle only; the
/// `side` argument is ignored for them. Returns `None` when no angle in
/// the precedence order measured the metric, including when `normal`
/// itself lacks it.
pub fn resolve(
    registry: &MetricRegistry,
    result_sets: &HashMap<CameraAngle, ResultSet>,
    base_key: &str,
    side: Side,
) -> Option<ResolvedValue> {
    let def = registry.lookup(base_key)?;

    if !def.bilateral {
        let value = result_sets.get(&CameraAngle::Normal)?.get(def.key)?;
        return Some(ResolvedValue {
            key: def.key.to_string(),
            side: None,
            value,
            source_angle: CameraAngle::Normal,
        });
    }

    let key = def.key_for(side);
    for angle in precedence(side) {
        if let Some(value) = result_sets.get(&angle).and_then(|rs| rs.get(&key)) {
            return Some(ResolvedValue {
                key,
                side: Some(side),
                value,
                source_angle: angle,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn result_set(angle: CameraAngle, pairs: &[(&str, f64)]) -> ResultSet {
        ResultSet {
            session_id: Uuid::nil(),
            angle,
            values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn registry() -> &'static MetricRegistry {
        MetricRegistry::builtin()
    }

    #[test]
    fn normal_only_session_falls_back_for_both_sides() {
        let mut sets = HashMap::new();
        sets.insert(
            CameraAngle::Normal,
            result_set(CameraAngle::Normal, &[("fat-l", 8.0), ("fat-r", 9.0)]),
        );

        let left = resolve(registry(), &sets, "fat", Side::Left).unwrap();
        assert_eq!(left.value, 8.0);
        assert_eq!(left.source_angle, CameraAngle::Normal);

        let right = resolve(registry(), &sets, "fat", Side::Right).unwrap();
        assert_eq!(right.value, 9.0);
        assert_eq!(right.source_angle, CameraAngle::Normal);
    }

    #[test]
    fn left_prefers_right_to_left_angle() {
        let mut sets = HashMap::new();
        sets.insert(
            CameraAngle::Normal,
            result_set(CameraAngle::Normal, &[("fat-l", 8.0)]),
        );
        sets.insert(
            CameraAngle::RightToLeft,
            result_set(CameraAngle::RightToLeft, &[("fat-l", 7.5)]),
        );

        let left = resolve(registry(), &sets, "fat", Side::Left).unwrap();
        assert_eq!(left.value, 7.5);
        assert_eq!(left.source_angle, CameraAngle::RightToLeft);
    }

    #[test]
    fn right_prefers_left_to_right_angle() {
        let mut sets = HashMap::new();
        sets.insert(
            CameraAngle::Normal,
            result_set(CameraAngle::Normal, &[("fat-r", 9.0)]),
        );
        sets.insert(
            CameraAngle::LeftToRight,
            result_set(CameraAngle::LeftToRight, &[("fat-r", 9.4)]),
        );

        let right = resolve(registry(), &sets, "fat", Side::Right).unwrap();
        assert_eq!(right.value, 9.4);
        assert_eq!(right.source_angle, CameraAngle::LeftToRight);
    }

    #[test]
    fn preferred_angle_missing_metric_falls_through() {
        // right_to_left uploaded but did not measure the metric
        let mut sets = HashMap::new();
        sets.insert(
            CameraAngle::RightToLeft,
            result_set(CameraAngle::RightToLeft, &[("col_pelvic_drop-l", 3.0)]),
        );
        sets.insert(
            CameraAngle::Normal,
            result_set(CameraAngle::Normal, &[("fat-l", 8.0)]),
        );

        let left = resolve(registry(), &sets, "fat", Side::Left).unwrap();
        assert_eq!(left.source_angle, CameraAngle::Normal);
    }

    #[test]
    fn side_agnostic_resolves_from_normal_only() {
        let mut sets = HashMap::new();
        sets.insert(
            CameraAngle::RightToLeft,
            result_set(CameraAngle::RightToLeft, &[("step_rate", 170.0)]),
        );

        // step_rate present only on a side angle: unavailable
        assert!(resolve(registry(), &sets, "step_rate", Side::Left).is_none());

        sets.insert(
            CameraAngle::Normal,
            result_set(CameraAngle::Normal, &[("step_rate", 172.0)]),
        );
        let resolved = resolve(registry(), &sets, "step_rate", Side::Left).unwrap();
        assert_eq!(resolved.value, 172.0);
        assert_eq!(resolved.side, None);
        assert_eq!(resolved.source_angle, CameraAngle::Normal);
    }

    #[test]
    fn absent_everywhere_is_unavailable_not_an_error() {
        let sets = HashMap::new();
        assert!(resolve(registry(), &sets, "fat", Side::Left).is_none());
        assert!(resolve(registry(), &sets, "unknown_metric", Side::Left).is_none());
    }
}
