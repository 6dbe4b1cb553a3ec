//! Health check handlers.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness check: the process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check: the record store answers a point read.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    let (status, database) =
        match tokio::time::timeout(READINESS_TIMEOUT, state.videos.get(Uuid::nil())).await {
            Ok(Ok(_)) => (StatusCode::OK, "ready".to_string()),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Record store readiness check failed");
                (StatusCode::SERVICE_UNAVAILABLE, format!("not_ready: {}", e))
            }
            Err(_) => {
                tracing::error!("Record store readiness check timed out");
                (StatusCode::SERVICE_UNAVAILABLE, "timeout".to_string())
            }
        };

    let overall = if status == StatusCode::OK { "ready" } else { "not_ready" };
    (
        status,
        Json(serde_json::json!({ "status": overall, "database": database })),
    )
}
