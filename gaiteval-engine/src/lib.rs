//! # Gait Metric Evaluation Engine
//!
//! Turns raw per-session running-gait measurements produced by the
//! vision pipeline into classified, comparable, chartable information:
//!
//! - [`registry`]: acceptability bands and labels per metric, the single
//!   source of truth for all bounds
//! - [`resolver`]: reconciles up to four camera-angle recordings into
//!   one value per metric and side
//! - [`classify`]: buckets a value into ideal / workable / check
//! - [`asymmetry`]: left/right difference scoring
//! - [`summary`]: per-session band tallies
//! - [`history`]: bounded-concurrency aggregation of a user's full
//!   session history into trend series
//! - [`recommend`]: rule-based coaching suggestions
//!
//! Everything except the history fan-out is synchronous and pure; the
//! engine holds no shared mutable state and persists nothing.

pub mod api;
pub mod asymmetry;
pub mod classify;
pub mod error;
pub mod history;
pub mod recommend;
pub mod registry;
pub mod resolver;
pub mod services;
pub mod summary;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

use gaiteval_common::config::EngineConfig;

use crate::history::HistoryAggregator;
use crate::registry::MetricRegistry;
use crate::services::HttpSessionSource;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EngineConfig>,
    pub registry: &'static MetricRegistry,
    pub source: Arc<HttpSessionSource>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: EngineConfig, source: HttpSessionSource) -> Self {
        Self {
            config: Arc::new(config),
            registry: MetricRegistry::builtin(),
            source: Arc::new(source),
            startup_time: Utc::now(),
        }
    }

    /// Configured catalogue size, falling back to the registry's own
    /// slot count
    pub fn catalogue_slots(&self) -> usize {
        self.config
            .catalogue_slots
            .unwrap_or_else(|| self.registry.slot_count())
    }

    /// Per-request aggregator over the production collaborators
    pub fn aggregator(&self) -> HistoryAggregator<'_, HttpSessionSource> {
        HistoryAggregator::new(
            self.source.as_ref(),
            self.registry,
            self.config.fetch_concurrency,
            self.catalogue_slots(),
        )
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::report_routes())
        .merge(api::history_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
