//! Single-session report endpoints
//!
//! The per-session classification contract consumed by presentation
//! layers: per-metric band/label/value/source rows, the band tally, and
//! the coaching recommendations. Handlers only orchestrate fetches and
//! call the engine; no band or fallback logic lives here.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use gaiteval_common::{AnalysisSession, CameraAngle, Error, SessionStatus};

use crate::error::{ApiError, ApiResult};
use crate::recommend::{recommend, SessionAverages};
use crate::summary::{evaluate_session, MetricEvaluation, SessionSummary};
use crate::AppState;

/// Full evaluation of one session
#[derive(Debug, Serialize)]
pub struct SessionReportResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub summary: SessionSummary,
    /// Configured catalogue size, the "slots not yet evaluated"
    /// denominator
    pub catalogue_slots: usize,
    pub metrics: Vec<MetricEvaluation>,
    pub recommendations: Vec<String>,
}

/// GET /api/sessions/{id}/report
pub async fn session_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionReportResponse>> {
    let listing = state.source.sessions.get_session(session_id).await?;
    if listing.status != SessionStatus::Completed {
        return Err(ApiError::Conflict(format!(
            "session {session_id} is not completed"
        )));
    }

    let mut session = AnalysisSession::new(listing);
    for angle in CameraAngle::all() {
        if !session.listing.has_angle(angle) {
            continue;
        }
        match state.source.results.fetch_result_set(session_id, angle).await {
            Ok(rs) => {
                session.result_sets.insert(angle, rs);
            }
            // Flagged as uploaded but gone from storage: degrade to the
            // remaining angles rather than failing the report
            Err(Error::NotFound(_)) => {
                warn!(session_id = %session_id, angle = %angle, "flagged angle has no result set");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let evaluation = evaluate_session(state.registry, &session, state.catalogue_slots());
    let averages = SessionAverages::from_session(state.registry, &session);
    let recommendations = recommend(&averages);

    Ok(Json(SessionReportResponse {
        session_id,
        created_at: session.listing.created_at,
        summary: evaluation.summary,
        catalogue_slots: evaluation.catalogue_slots,
        metrics: evaluation.metrics,
        recommendations,
    }))
}

#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    /// Angle to read the frame series from; defaults to `normal`
    pub angle: Option<String>,
}

/// One metric's intra-stride frame series
#[derive(Debug, Serialize)]
pub struct FrameSeriesResponse {
    pub session_id: Uuid,
    pub angle: CameraAngle,
    pub metric: String,
    /// One entry per video frame; `null` where the frame lacked the
    /// metric
    pub frames: Vec<Option<f64>>,
}

/// GET /api/sessions/{id}/frames/{metric}
///
/// Frame-by-frame series for single-session intra-stride charts. Never
/// used for cross-session trends.
pub async fn frame_series(
    State(state): State<AppState>,
    Path((session_id, metric)): Path<(Uuid, String)>,
    Query(query): Query<FrameQuery>,
) -> ApiResult<Json<FrameSeriesResponse>> {
    let angle = match query.angle.as_deref() {
        Some(s) => s
            .parse::<CameraAngle>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => CameraAngle::Normal,
    };

    let series = state
        .source
        .results
        .fetch_frame_series(session_id, angle)
        .await?;
    if !series.keys.iter().any(|k| k == &metric) {
        return Err(ApiError::NotFound(format!(
            "metric {metric} not present in {angle} frame series"
        )));
    }

    Ok(Json(FrameSeriesResponse {
        session_id,
        angle,
        frames: series.series(&metric),
        metric,
    }))
}

/// Build session report routes
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions/:session_id/report", get(session_report))
        .route(
            "/api/sessions/:session_id/frames/:metric",
            get(frame_series),
        )
}
