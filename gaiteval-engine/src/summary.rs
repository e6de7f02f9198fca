//! Session summary builder
//!
//! Walks the full metric catalogue for one completed session, resolves
//! and classifies every slot (bilateral metrics count left and right as
//! two slots), and tallies how many landed in each band. Slots whose
//! value could not be resolved are excluded from the tallies; the
//! display denominator for "slots not yet evaluated" is the configured
//! catalogue size, never recounted at call sites.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use gaiteval_common::{AnalysisSession, CameraAngle, Side};

use crate::classify::{classify, label, ClassificationBand};
use crate::registry::MetricRegistry;
use crate::resolver::resolve;

/// Per-session tally of classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub ideal: usize,
    pub workable: usize,
    pub check: usize,
}

impl SessionSummary {
    /// Slots that resolved to a value and were classified
    pub fn evaluated(&self) -> usize {
        self.ideal + self.workable + self.check
    }
}

/// Classification detail for one catalogue slot
#[derive(Debug, Clone, Serialize)]
pub struct MetricEvaluation {
    /// Full key, including any side suffix
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub band: ClassificationBand,
    pub label: String,
    /// Absent when the slot was not evaluable; never coerced to zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Presentation default: the value, or 0 when not evaluable. Only
    /// for display surfaces that require a number; classification always
    /// uses `value`.
    pub display_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_angle: Option<CameraAngle>,
}

/// Full evaluation of one session: summary plus per-slot detail
#[derive(Debug, Clone, Serialize)]
pub struct SessionEvaluation {
    pub summary: SessionSummary,
    pub metrics: Vec<MetricEvaluation>,
    /// Configured catalogue size (distinct metrics x sides), the
    /// denominator for "slots not yet evaluated" displays
    pub catalogue_slots: usize,
}

/// Evaluate every catalogue slot for one session.
pub fn evaluate_session(
    registry: &MetricRegistry,
    session: &AnalysisSession,
    catalogue_slots: usize,
) -> SessionEvaluation {
    let mut metrics = Vec::with_capacity(catalogue_slots);
    let mut summary = SessionSummary {
        session_id: session.listing.id,
        created_at: session.listing.created_at,
        ideal: 0,
        workable: 0,
        check: 0,
    };

    for def in registry.entries() {
        let sides: &[Option<Side>] = if def.bilateral {
            &[Some(Side::Left), Some(Side::Right)]
        } else {
            &[None]
        };
        for &side in sides {
            let resolved = resolve(
                registry,
                &session.result_sets,
                def.key,
                side.unwrap_or(Side::Left),
            );
            let value = resolved.as_ref().map(|r| r.value);
            let key = match side {
                Some(s) => def.key_for(s),
                None => def.key.to_string(),
            };
            let band = classify(registry, &key, value);
            match band {
                ClassificationBand::Ideal => summary.ideal += 1,
                ClassificationBand::Workable => summary.workable += 1,
                ClassificationBand::Check => summary.check += 1,
                ClassificationBand::NotEvaluable => {}
            }
            metrics.push(MetricEvaluation {
                label: label(registry, &key, value).to_string(),
                key,
                side,
                band,
                value,
                display_value: value.unwrap_or(0.0),
                source_angle: resolved.map(|r| r.source_angle),
            });
        }
    }

    SessionEvaluation {
        summary,
        metrics,
        catalogue_slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaiteval_common::{ResultSet, SessionListing, SessionStatus};
    use std::collections::HashMap;

    fn session_with_normal(pairs: &[(&str, f64)]) -> AnalysisSession {
        let listing = SessionListing {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            created_at: Utc::now(),
            status: SessionStatus::Completed,
            uploaded_angles: vec![CameraAngle::Normal],
        };
        let mut session = AnalysisSession::new(listing);
        session.result_sets.insert(
            CameraAngle::Normal,
            ResultSet {
                session_id: Uuid::nil(),
                angle: CameraAngle::Normal,
                values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            },
        );
        session
    }

    #[test]
    fn tallies_cover_every_resolved_slot() {
        let registry = MetricRegistry::builtin();
        let session = session_with_normal(&[
            ("step_rate", 170.0),          // ideal
            ("vertical_oscillation", 10.0), // workable
            ("fat-l", 8.0),                // ideal
            ("fat-r", 25.0),               // check
        ]);
        let eval = evaluate_session(registry, &session, registry.slot_count());

        assert_eq!(eval.summary.ideal, 2);
        assert_eq!(eval.summary.workable, 1);
        assert_eq!(eval.summary.check, 1);
        assert_eq!(eval.summary.evaluated(), 4);
        assert_eq!(eval.catalogue_slots, 13);
        // every catalogue slot appears in the detail rows
        assert_eq!(eval.metrics.len(), registry.slot_count());
    }

    #[test]
    fn bilateral_sides_classify_independently() {
        let registry = MetricRegistry::builtin();
        let session = session_with_normal(&[("fat-l", 8.0), ("fat-r", 25.0)]);
        let eval = evaluate_session(registry, &session, registry.slot_count());

        let left = eval.metrics.iter().find(|m| m.key == "fat-l").unwrap();
        let right = eval.metrics.iter().find(|m| m.key == "fat-r").unwrap();
        assert_eq!(left.band, ClassificationBand::Ideal);
        assert_eq!(right.band, ClassificationBand::Check);
        assert_eq!(right.label, "Heel striking hard");
    }

    #[test]
    fn unresolved_slots_are_not_evaluable_and_untallied() {
        let registry = MetricRegistry::builtin();
        let session = session_with_normal(&[("step_rate", 170.0)]);
        let eval = evaluate_session(registry, &session, registry.slot_count());

        assert_eq!(eval.summary.evaluated(), 1);
        let unresolved = eval.metrics.iter().find(|m| m.key == "step_width").unwrap();
        assert_eq!(unresolved.band, ClassificationBand::NotEvaluable);
        assert_eq!(unresolved.value, None);
        assert_eq!(unresolved.display_value, 0.0);
        assert_eq!(unresolved.source_angle, None);
        assert_eq!(unresolved.label, "Not evaluated");
    }

    #[test]
    fn empty_session_evaluates_to_zero_counts() {
        let registry = MetricRegistry::builtin();
        let mut session = session_with_normal(&[]);
        session.result_sets.clear();
        let eval = evaluate_session(registry, &session, registry.slot_count());
        assert_eq!(eval.summary.evaluated(), 0);
    }
}
