//! Multi-session history and trend endpoints
//!
//! Pagination here is a pure slice over the aggregator's already-sorted
//! in-memory series; turning a page never refetches.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::history::{paginate, HistoryEntry, TrendPoint};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number; defaults to 1
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Paginated slice of a user's ordered session summaries
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub page: usize,
    pub per_page: usize,
    /// Total sessions in the full series, for page controls
    pub total: usize,
    pub entries: Vec<HistoryEntry>,
}

/// GET /api/users/{id}/history
pub async fn user_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let entries = state.aggregator().build_history(user_id).await?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(state.config.default_page_size).max(1);
    let total = entries.len();
    let entries = paginate(&entries, page, per_page).to_vec();

    Ok(Json(HistoryResponse {
        page,
        per_page,
        total,
        entries,
    }))
}

/// Paginated slice of a user's trend series for one metric
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub metric: String,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub points: Vec<TrendPoint>,
}

/// GET /api/users/{id}/trend/{metric}
pub async fn metric_trend(
    State(state): State<AppState>,
    Path((user_id, metric)): Path<(Uuid, String)>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<TrendResponse>> {
    if state.registry.lookup(&metric).is_none() {
        return Err(ApiError::NotFound(format!("unknown metric {metric}")));
    }

    let points = state.aggregator().build_metric_trend(user_id, &metric).await?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(state.config.default_page_size).max(1);
    let total = points.len();
    let points = paginate(&points, page, per_page).to_vec();

    Ok(Json(TrendResponse {
        metric,
        page,
        per_page,
        total,
        points,
    }))
}

/// Build history/trend routes
pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/:user_id/history", get(user_history))
        .route("/api/users/:user_id/trend/:metric", get(metric_trend))
}
