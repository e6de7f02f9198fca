//! Longitudinal history aggregation
//!
//! Fetches all of a user's completed sessions from the collaborators,
//! evaluates each one, and produces chronologically ordered series for
//! trend charts: per-session band tallies and per-metric left/right
//! series.
//!
//! Fan-out runs with bounded concurrency (`buffer_unordered`) so a long
//! history cannot overwhelm the storage collaborator. A single session's
//! fetch or parse failure is isolated: it contributes an entry with
//! empty metrics and an error note, and the batch continues. Ordering is
//! applied only after every fetch has resolved, so completion order
//! never leaks into the output: sessions sort by `created_at` ascending
//! with `session_id` as the tie-break, then receive 1-based report
//! numbers, the canonical x-axis for every trend chart.
//!
//! Nothing is cached and nothing external is mutated, so dropping the
//! returned future (caller navigated away) cancels all in-flight
//! fetches without side effects.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use gaiteval_common::{
    AnalysisSession, CameraAngle, Result, ResultSet, SessionListing, SessionStatus, Side,
};

use crate::registry::MetricRegistry;
use crate::resolver::resolve;
use crate::summary::{evaluate_session, SessionSummary};

/// Read access to the session listing and result-set collaborators.
///
/// The HTTP clients implement this for production; tests substitute an
/// in-memory source.
pub trait SessionSource: Sync {
    fn list_sessions(
        &self,
        user_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<SessionListing>>> + Send;

    fn fetch_result_set(
        &self,
        session_id: Uuid,
        angle: CameraAngle,
    ) -> impl std::future::Future<Output = Result<ResultSet>> + Send;
}

/// One session in a user's ordered history
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// 1-based chronological index, the trend-chart x-axis
    pub report_number: usize,
    pub summary: SessionSummary,
    /// Soft-failure note; present when this session's data could not be
    /// fetched or parsed and its counts are therefore empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One session's contribution to a single metric's trend series
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub report_number: usize,
    pub session_id: Uuid,
    pub date: DateTime<Utc>,
    /// Bilateral metrics carry left/right; side-agnostic carry `value`.
    /// All absent when the session lacked the metric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A fetched session, successful or soft-failed
struct FetchedSession {
    session: AnalysisSession,
    error: Option<String>,
}

/// Aggregates a user's history against a session source
pub struct HistoryAggregator<'a, S> {
    source: &'a S,
    registry: &'a MetricRegistry,
    fetch_concurrency: usize,
    catalogue_slots: usize,
}

impl<'a, S: SessionSource> HistoryAggregator<'a, S> {
    pub fn new(
        source: &'a S,
        registry: &'a MetricRegistry,
        fetch_concurrency: usize,
        catalogue_slots: usize,
    ) -> Self {
        Self {
            source,
            registry,
            fetch_concurrency,
            catalogue_slots,
        }
    }

    /// Build the user's full ordered history of session summaries.
    pub async fn build_history(&self, user_id: Uuid) -> Result<Vec<HistoryEntry>> {
        let fetched = self.fetch_completed_sessions(user_id).await?;

        let entries = fetched
            .into_iter()
            .enumerate()
            .map(|(index, f)| HistoryEntry {
                report_number: index + 1,
                summary: evaluate_session(self.registry, &f.session, self.catalogue_slots).summary,
                error: f.error,
            })
            .collect();
        Ok(entries)
    }

    /// Build the user's ordered trend series for one metric (base key,
    /// without side suffix). Sessions missing the metric still appear,
    /// with empty fields, to keep report numbers aligned across charts.
    pub async fn build_metric_trend(
        &self,
        user_id: Uuid,
        base_key: &str,
    ) -> Result<Vec<TrendPoint>> {
        let bilateral = self
            .registry
            .lookup(base_key)
            .is_some_and(|def| def.bilateral);
        let fetched = self.fetch_completed_sessions(user_id).await?;

        let points = fetched
            .into_iter()
            .enumerate()
            .map(|(index, f)| {
                let sets = &f.session.result_sets;
                let (left, right, value) = if bilateral {
                    (
                        resolve(self.registry, sets, base_key, Side::Left).map(|r| r.value),
                        resolve(self.registry, sets, base_key, Side::Right).map(|r| r.value),
                        None,
                    )
                } else {
                    (
                        None,
                        None,
                        resolve(self.registry, sets, base_key, Side::Left).map(|r| r.value),
                    )
                };
                TrendPoint {
                    report_number: index + 1,
                    session_id: f.session.listing.id,
                    date: f.session.listing.created_at,
                    left,
                    right,
                    value,
                }
            })
            .collect();
        Ok(points)
    }

    /// Fetch and parse every completed session's uploaded angles, with
    /// at most `fetch_concurrency` sessions in flight. Per-session
    /// failures become soft errors; only the initial listing call can
    /// fail the whole aggregation.
    async fn fetch_completed_sessions(&self, user_id: Uuid) -> Result<Vec<FetchedSession>> {
        let listings = self.source.list_sessions(user_id).await?;
        let completed: Vec<SessionListing> = listings
            .into_iter()
            .filter(|l| l.status == SessionStatus::Completed)
            .collect();
        debug!(
            user_id = %user_id,
            sessions = completed.len(),
            "aggregating completed sessions"
        );

        let mut fetched: Vec<FetchedSession> = stream::iter(completed)
            .map(|listing| self.fetch_session(listing))
            .buffer_unordered(self.fetch_concurrency)
            .collect()
            .await;

        // Deterministic ordering regardless of fetch completion order
        fetched.sort_by(|a, b| {
            (a.session.listing.created_at, a.session.listing.id)
                .cmp(&(b.session.listing.created_at, b.session.listing.id))
        });
        Ok(fetched)
    }

    async fn fetch_session(&self, listing: SessionListing) -> FetchedSession {
        let mut session = AnalysisSession::new(listing);

        for angle in CameraAngle::all() {
            if !session.listing.has_angle(angle) {
                continue;
            }
            match self
                .source
                .fetch_result_set(session.listing.id, angle)
                .await
            {
                Ok(rs) => {
                    session.result_sets.insert(angle, rs);
                }
                Err(e) => {
                    // Soft failure: keep the session, drop its metrics
                    warn!(
                        session_id = %session.listing.id,
                        angle = %angle,
                        error = %e,
                        "result set unavailable, session contributes no metrics"
                    );
                    session.result_sets.clear();
                    return FetchedSession {
                        session,
                        error: Some(e.to_string()),
                    };
                }
            }
        }

        FetchedSession {
            session,
            error: None,
        }
    }
}

/// Pure slice-based pagination over an already-ordered series. Pages
/// are 1-based; an out-of-range page yields an empty slice. Performs no
/// additional fetches.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_without_refetch() {
        let items: Vec<u32> = (1..=7).collect();
        assert_eq!(paginate(&items, 1, 3), &[1, 2, 3]);
        assert_eq!(paginate(&items, 2, 3), &[4, 5, 6]);
        assert_eq!(paginate(&items, 3, 3), &[7]);
        assert_eq!(paginate(&items, 4, 3), &[] as &[u32]);
    }

    #[test]
    fn paginate_treats_page_zero_as_first() {
        let items = [10, 20];
        assert_eq!(paginate(&items, 0, 5), &[10, 20]);
    }

    #[test]
    fn paginate_empty_input() {
        let items: [u8; 0] = [];
        assert_eq!(paginate(&items, 1, 10), &[] as &[u8]);
    }
}
