//! Metric range registry
//!
//! The single source of truth for every metric's acceptability bands and
//! descriptive labels. The original implementation grew several divergent
//! copies of these tables; here the bounds live in exactly one place and
//! every other component receives the registry by reference. The table is
//! built once at process start and never mutated.
//!
//! Keys follow the vision pipeline's naming: a bilateral metric is
//! addressed as `key-l` / `key-r`, a side-agnostic metric (e.g. cadence)
//! by its bare key.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use gaiteval_common::Side;

/// A closed numeric interval; both bounds are inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBand {
    pub min: f64,
    pub max: f64,
}

impl RangeBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Descriptive labels for the five sub-regions of a metric's range
#[derive(Debug, Clone, Copy)]
pub struct SubRangeLabels {
    pub below_workable: &'static str,
    pub workable_low: &'static str,
    pub ideal: &'static str,
    pub workable_high: &'static str,
    pub above_workable: &'static str,
}

/// Acceptability bands and labels for one measured gait quantity
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    /// Base key without any `-l`/`-r` suffix
    pub key: &'static str,
    pub unit: &'static str,
    /// Measured per side when true; addressed as `key-l` / `key-r`
    pub bilateral: bool,
    /// Optimal interval; always contained in `workable` when present
    pub ideal: Option<RangeBand>,
    /// Broader, still-acceptable interval
    pub workable: RangeBand,
    pub labels: SubRangeLabels,
}

impl MetricDefinition {
    /// Number of classification slots this metric contributes
    /// (bilateral metrics classify left and right independently)
    pub fn slots(&self) -> usize {
        if self.bilateral {
            2
        } else {
            1
        }
    }

    /// Full key for one side of this metric
    pub fn key_for(&self, side: Side) -> String {
        if self.bilateral {
            format!("{}{}", self.key, side.suffix())
        } else {
            self.key.to_string()
        }
    }
}

/// Read-only registry of metric definitions, keyed by base key
#[derive(Debug)]
pub struct MetricRegistry {
    entries: HashMap<&'static str, MetricDefinition>,
    /// Catalogue order, for stable iteration in reports
    order: Vec<&'static str>,
}

impl MetricRegistry {
    /// The process-wide built-in catalogue
    pub fn builtin() -> &'static MetricRegistry {
        static BUILTIN: Lazy<MetricRegistry> = Lazy::new(MetricRegistry::build_catalogue);
        &BUILTIN
    }

    /// Look up a metric by key. A per-side key (`fat-l`) canonicalizes
    /// to its base entry when no exact per-side entry exists.
    pub fn lookup(&self, key: &str) -> Option<&MetricDefinition> {
        if let Some(def) = self.entries.get(key) {
            return Some(def);
        }
        let base = key.strip_suffix("-l").or_else(|| key.strip_suffix("-r"))?;
        self.entries.get(base)
    }

    /// All definitions in catalogue order
    pub fn entries(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.order.iter().map(|k| &self.entries[k])
    }

    /// Total classification slots (distinct metrics x sides). The
    /// default denominator for "slots not yet evaluated" displays.
    pub fn slot_count(&self) -> usize {
        self.entries.values().map(MetricDefinition::slots).sum()
    }

    fn build_catalogue() -> MetricRegistry {
        let defs = vec![
            MetricDefinition {
                key: "step_rate",
                unit: "spm",
                bilateral: false,
                ideal: Some(RangeBand::new(163.0, 184.0)),
                workable: RangeBand::new(154.0, 192.0),
                labels: SubRangeLabels {
                    below_workable: "Cadence too low",
                    workable_low: "Cadence slightly low",
                    ideal: "Cadence on target",
                    workable_high: "Cadence slightly high",
                    above_workable: "Cadence too high",
                },
            },
            MetricDefinition {
                key: "stride_length",
                unit: "m",
                bilateral: false,
                ideal: Some(RangeBand::new(1.10, 1.40)),
                workable: RangeBand::new(0.95, 1.55),
                labels: SubRangeLabels {
                    below_workable: "Stride too short",
                    workable_low: "Stride slightly short",
                    ideal: "Stride length on target",
                    workable_high: "Stride slightly long",
                    above_workable: "Overstriding",
                },
            },
            MetricDefinition {
                key: "vertical_oscillation",
                unit: "cm",
                bilateral: false,
                ideal: Some(RangeBand::new(6.0, 9.0)),
                workable: RangeBand::new(4.0, 11.0),
                labels: SubRangeLabels {
                    below_workable: "Vertical oscillation very low",
                    workable_low: "Vertical oscillation slightly low",
                    ideal: "Vertical oscillation on target",
                    workable_high: "Vertical oscillation slightly high",
                    above_workable: "Bouncing too much",
                },
            },
            MetricDefinition {
                key: "trunk_lean",
                unit: "deg",
                bilateral: false,
                ideal: Some(RangeBand::new(4.0, 8.0)),
                workable: RangeBand::new(2.0, 12.0),
                labels: SubRangeLabels {
                    below_workable: "Trunk too upright",
                    workable_low: "Trunk lean slightly low",
                    ideal: "Trunk lean on target",
                    workable_high: "Trunk lean slightly high",
                    above_workable: "Leaning too far forward",
                },
            },
            MetricDefinition {
                key: "step_width",
                unit: "cm",
                bilateral: false,
                ideal: Some(RangeBand::new(5.0, 10.0)),
                workable: RangeBand::new(2.0, 14.0),
                labels: SubRangeLabels {
                    below_workable: "Steps crossing the midline",
                    workable_low: "Step width slightly narrow",
                    ideal: "Step width on target",
                    workable_high: "Step width slightly wide",
                    above_workable: "Step width too wide",
                },
            },
            MetricDefinition {
                key: "ground_contact_time",
                unit: "ms",
                bilateral: true,
                ideal: Some(RangeBand::new(165.0, 210.0)),
                workable: RangeBand::new(150.0, 240.0),
                labels: SubRangeLabels {
                    below_workable: "Ground contact very short",
                    workable_low: "Ground contact slightly short",
                    ideal: "Ground contact on target",
                    workable_high: "Ground contact slightly long",
                    above_workable: "Ground contact too long",
                },
            },
            MetricDefinition {
                key: "fat",
                unit: "deg",
                bilateral: true,
                ideal: Some(RangeBand::new(3.0, 12.0)),
                workable: RangeBand::new(0.0, 18.0),
                labels: SubRangeLabels {
                    below_workable: "Foot angle at touchdown too flat",
                    workable_low: "Foot angle at touchdown slightly flat",
                    ideal: "Foot angle at touchdown on target",
                    workable_high: "Foot angle at touchdown slightly steep",
                    above_workable: "Heel striking hard",
                },
            },
            // The source material also showed ideal [2,4] with workable
            // [4,6]; stored here as workable [2,6] so containment holds.
            // Bounds pending confirmation by the catalogue owner.
            MetricDefinition {
                key: "col_pelvic_drop",
                unit: "deg",
                bilateral: true,
                ideal: Some(RangeBand::new(2.0, 4.0)),
                workable: RangeBand::new(2.0, 6.0),
                labels: SubRangeLabels {
                    below_workable: "Pelvis unusually rigid",
                    workable_low: "Pelvic drop on the low side",
                    ideal: "Pelvic drop on target",
                    workable_high: "Pelvic drop slightly high",
                    above_workable: "Excessive pelvic drop",
                },
            },
            MetricDefinition {
                key: "knee_flexion_stance",
                unit: "deg",
                bilateral: true,
                ideal: Some(RangeBand::new(38.0, 45.0)),
                workable: RangeBand::new(30.0, 50.0),
                labels: SubRangeLabels {
                    below_workable: "Knee too straight in stance",
                    workable_low: "Knee flexion slightly low",
                    ideal: "Knee flexion on target",
                    workable_high: "Knee flexion slightly high",
                    above_workable: "Knee collapsing in stance",
                },
            },
        ];

        let order = defs.iter().map(|d| d.key).collect();
        let entries = defs.into_iter().map(|d| (d.key, d)).collect();
        MetricRegistry { entries, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workable_contains_ideal_for_whole_catalogue() {
        for def in MetricRegistry::builtin().entries() {
            if let Some(ideal) = def.ideal {
                assert!(
                    def.workable.min <= ideal.min && ideal.max <= def.workable.max,
                    "{}: workable {:?} does not contain ideal {:?}",
                    def.key,
                    def.workable,
                    ideal
                );
            }
        }
    }

    #[test]
    fn lookup_canonicalizes_side_suffix() {
        let registry = MetricRegistry::builtin();
        let direct = registry.lookup("fat").unwrap();
        let left = registry.lookup("fat-l").unwrap();
        let right = registry.lookup("fat-r").unwrap();
        assert_eq!(direct.key, left.key);
        assert_eq!(direct.key, right.key);
    }

    #[test]
    fn lookup_unknown_key_is_none() {
        assert!(MetricRegistry::builtin().lookup("hip_wobble").is_none());
        assert!(MetricRegistry::builtin().lookup("hip_wobble-l").is_none());
    }

    #[test]
    fn slot_count_counts_bilateral_twice() {
        let registry = MetricRegistry::builtin();
        let singles = registry.entries().filter(|d| !d.bilateral).count();
        let bilateral = registry.entries().filter(|d| d.bilateral).count();
        assert_eq!(registry.slot_count(), singles + 2 * bilateral);
        // 5 side-agnostic + 4 bilateral metrics in the built-in catalogue
        assert_eq!(registry.slot_count(), 13);
    }

    #[test]
    fn key_for_side() {
        let registry = MetricRegistry::builtin();
        let gct = registry.lookup("ground_contact_time").unwrap();
        assert_eq!(gct.key_for(Side::Left), "ground_contact_time-l");
        let cadence = registry.lookup("step_rate").unwrap();
        assert_eq!(cadence.key_for(Side::Right), "step_rate");
    }

    #[test]
    fn bands_are_closed_intervals() {
        let band = RangeBand::new(154.0, 192.0);
        assert!(band.contains(154.0));
        assert!(band.contains(192.0));
        assert!(!band.contains(153.999));
        assert_eq!(band.midpoint(), 173.0);
    }
}
