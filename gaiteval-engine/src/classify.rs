//! Band classification
//!
//! Pure, total functions from (metric key, value) to a qualitative band
//! and a descriptive label. Unknown keys and missing values classify as
//! `NotEvaluable`; nothing here ever panics or errors.
//!
//! Boundary values belong to the more favorable band: a value exactly on
//! an ideal bound is `Ideal`, exactly on a workable bound is `Workable`.

use serde::{Deserialize, Serialize};

use crate::registry::{MetricDefinition, MetricRegistry};

/// Qualitative bucket for one resolved metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationBand {
    /// Within the metric's optimal interval
    Ideal,
    /// Outside ideal but within the still-acceptable interval
    Workable,
    /// Outside the workable interval; attention warranted
    Check,
    /// Unknown metric or no resolved value
    NotEvaluable,
}

/// Classify a value against the registry's bands for `key`.
///
/// `key` may be a per-side key (`fat-l`); it canonicalizes to the
/// side-agnostic entry when no per-side entry exists.
pub fn classify(registry: &MetricRegistry, key: &str, value: Option<f64>) -> ClassificationBand {
    let (Some(def), Some(value)) = (registry.lookup(key), value) else {
        return ClassificationBand::NotEvaluable;
    };
    classify_with(def, value)
}

fn classify_with(def: &MetricDefinition, value: f64) -> ClassificationBand {
    if def.ideal.is_some_and(|ideal| ideal.contains(value)) {
        return ClassificationBand::Ideal;
    }
    if def.workable.contains(value) {
        return ClassificationBand::Workable;
    }
    ClassificationBand::Check
}

/// Descriptive label for a value, always indicating direction for
/// out-of-band values ("too low" vs "too high", never just magnitude).
///
/// Within the workable band the label picks the half the value falls
/// in, relative to the workable band's midpoint.
pub fn label(registry: &MetricRegistry, key: &str, value: Option<f64>) -> &'static str {
    let (Some(def), Some(value)) = (registry.lookup(key), value) else {
        return "Not evaluated";
    };

    match classify_with(def, value) {
        ClassificationBand::Ideal => def.labels.ideal,
        ClassificationBand::Workable => {
            if value <= def.workable.midpoint() {
                def.labels.workable_low
            } else {
                def.labels.workable_high
            }
        }
        ClassificationBand::Check => {
            if value < def.workable.min {
                def.labels.below_workable
            } else {
                def.labels.above_workable
            }
        }
        ClassificationBand::NotEvaluable => "Not evaluated",
    }
}
