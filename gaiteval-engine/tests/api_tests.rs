//! HTTP surface tests
//!
//! Drives the router directly with tower's `oneshot`; only endpoints
//! that do not reach the collaborators are exercised here (the
//! aggregation paths are covered against a mock source in
//! `history_aggregation.rs`).

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use gaiteval_common::config::EngineConfig;
use gaiteval_engine::services::HttpSessionSource;
use gaiteval_engine::{build_router, AppState};

fn test_app() -> axum::Router {
    // Collaborator base URLs are never contacted by these tests
    let config = EngineConfig::default();
    let source = HttpSessionSource::new(&config.session_api_base, &config.storage_base).unwrap();
    build_router(AppState::new(config, source))
}

#[tokio::test]
async fn health_reports_ok() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "gaiteval-engine");
}

#[tokio::test]
async fn unknown_trend_metric_is_404_before_any_fetch() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/users/00000000-0000-0000-0000-000000000000/trend/warp_factor")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn invalid_frame_angle_is_400() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/sessions/00000000-0000-0000-0000-000000000000/frames/step_rate?angle=sideways")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_session_id_is_rejected() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/sessions/not-a-uuid/report")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
