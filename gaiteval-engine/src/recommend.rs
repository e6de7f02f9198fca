//! Rule-based coaching recommendations
//!
//! Inspects a session's averaged values and side asymmetries and emits
//! prioritized, human-readable suggestions. Rules run in a fixed order
//! and each decides independently from its own threshold; the thresholds
//! are deliberately rule-specific and looser than the registry bands, so
//! a "workable" value does not necessarily trigger coaching advice.
//!
//! Deterministic: same averages in, same messages out, no randomness.

use std::collections::HashMap;

use gaiteval_common::{AnalysisSession, Side};

use crate::asymmetry::{asymmetry, Asymmetry};
use crate::registry::MetricRegistry;
use crate::resolver::resolve;

// Rule thresholds. Informed by the registry bands but owned by the
// recommendation rules; the registry stays the sole authority on bands.
const LOW_CADENCE_SPM: f64 = 160.0;
const HIGH_CADENCE_SPM: f64 = 188.0;
const LONG_CONTACT_MS: f64 = 225.0;
const HIGH_PELVIC_DROP_DEG: f64 = 5.0;
const LOW_TRUNK_LEAN_DEG: f64 = 3.0;
const HIGH_TRUNK_LEAN_DEG: f64 = 10.0;
const WIDE_STEP_CM: f64 = 12.0;
const HIGH_OSCILLATION_CM: f64 = 10.0;
/// Relative left/right difference above which the asymmetry rule fires
const ASYMMETRY_PERCENT: f64 = 10.0;

/// Bilateral metrics inspected by the asymmetry rule, in priority order.
/// Only the first one over the threshold emits, to avoid flooding the
/// runner with repeated asymmetry warnings.
const ASYMMETRY_WATCH_LIST: [(&str, &str); 4] = [
    ("ground_contact_time", "ground contact time"),
    ("col_pelvic_drop", "pelvic drop"),
    ("fat", "foot angle at touchdown"),
    ("knee_flexion_stance", "knee flexion in stance"),
];

/// Per-session averaged values and asymmetries, the recommendation
/// rules' only input
#[derive(Debug, Clone, Default)]
pub struct SessionAverages {
    /// Base key to session average. Bilateral metrics average whatever
    /// sides resolved; side-agnostic metrics carry their single value.
    values: HashMap<&'static str, f64>,
    /// Base key to asymmetry, only for bilateral metrics where both
    /// sides resolved
    asymmetries: HashMap<&'static str, Asymmetry>,
}

impl SessionAverages {
    /// Build averages from one session's resolved values.
    pub fn from_session(registry: &MetricRegistry, session: &AnalysisSession) -> Self {
        let mut averages = SessionAverages::default();

        for def in registry.entries() {
            if def.bilateral {
                let left = resolve(registry, &session.result_sets, def.key, Side::Left);
                let right = resolve(registry, &session.result_sets, def.key, Side::Right);
                match (left, right) {
                    (Some(l), Some(r)) => {
                        averages.values.insert(def.key, (l.value + r.value) / 2.0);
                        averages
                            .asymmetries
                            .insert(def.key, asymmetry(l.value, r.value));
                    }
                    (Some(only), None) | (None, Some(only)) => {
                        averages.values.insert(def.key, only.value);
                    }
                    (None, None) => {}
                }
            } else if let Some(v) = resolve(registry, &session.result_sets, def.key, Side::Left) {
                averages.values.insert(def.key, v.value);
            }
        }

        averages
    }

    pub fn value(&self, base_key: &str) -> Option<f64> {
        self.values.get(base_key).copied()
    }

    pub fn asymmetry(&self, base_key: &str) -> Option<Asymmetry> {
        self.asymmetries.get(base_key).copied()
    }
}

/// Generate coaching suggestions for one session, in priority order.
///
/// Emits exactly one default encouragement when no rule fires.
pub fn recommend(averages: &SessionAverages) -> Vec<String> {
    let mut messages = Vec::new();

    if let Some(cadence) = averages.value("step_rate") {
        if cadence < LOW_CADENCE_SPM {
            messages.push(format!(
                "Your cadence averages {cadence:.0} steps per minute. Quicker, shorter steps \
                 (aim for the high 160s) reduce impact load."
            ));
        } else if cadence > HIGH_CADENCE_SPM {
            messages.push(format!(
                "Your cadence averages {cadence:.0} steps per minute, which is on the hasty \
                 side. Let your stride open up a little."
            ));
        }
    }

    if let Some(gct) = averages.value("ground_contact_time") {
        if gct > LONG_CONTACT_MS {
            messages.push(format!(
                "Ground contact time averages {gct:.0} ms. Faster turnover and a slightly \
                 firmer footstrike will shorten it."
            ));
        }
    }

    if let Some(drop) = averages.value("col_pelvic_drop") {
        if drop > HIGH_PELVIC_DROP_DEG {
            messages.push(format!(
                "Pelvic drop averages {drop:.1} degrees. Hip abductor strength work \
                 (side planks, single-leg bridges) helps stabilize the pelvis."
            ));
        }
    }

    if let Some(lean) = averages.value("trunk_lean") {
        if lean < LOW_TRUNK_LEAN_DEG {
            messages.push(format!(
                "You run very upright ({lean:.1} degrees of trunk lean). A slight forward \
                 lean from the ankles improves propulsion."
            ));
        } else if lean > HIGH_TRUNK_LEAN_DEG {
            messages.push(format!(
                "Trunk lean averages {lean:.1} degrees, which is a lot of forward fold. \
                 Think tall hips and an open chest."
            ));
        }
    }

    if let Some(width) = averages.value("step_width") {
        if width > WIDE_STEP_CM {
            messages.push(format!(
                "Step width averages {width:.1} cm. Aim to land closer under your hips."
            ));
        }
    }

    if let Some(osc) = averages.value("vertical_oscillation") {
        if osc > HIGH_OSCILLATION_CM {
            messages.push(format!(
                "Vertical oscillation averages {osc:.1} cm. Drive forward rather than up \
                 to stop the bounce."
            ));
        }
    }

    // First watch-list asymmetry over threshold wins; the rest stay quiet
    for (base_key, display_name) in ASYMMETRY_WATCH_LIST {
        if let Some(asym) = averages.asymmetry(base_key) {
            if asym.percent > ASYMMETRY_PERCENT {
                messages.push(format!(
                    "Your left and right {display_name} differ by {:.0}%. Single-leg \
                     strength and balance work can even this out.",
                    asym.percent
                ));
                break;
            }
        }
    }

    if messages.is_empty() {
        messages.push(
            "Your running form looks solid across the board. Keep up the consistent training!"
                .to_string(),
        );
    }

    messages
}
