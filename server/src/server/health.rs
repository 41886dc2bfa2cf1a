//! Readiness and metrics endpoints.
//!
//! Liveness (`/health`) comes from `vendor_portal_web::handlers`.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use vendor_portal_web::AppError;

use super::state::AppState;

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Commerce API reachable with the configured credentials
    pub upstream: bool,
}

/// Readiness check endpoint.
///
/// Asks the commerce client's health check whether the platform answers with
/// the configured credentials. Any upstream error makes the service not ready.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8000/ready
/// # {"ready":true,"upstream":true}
/// ```
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let upstream = state.commerce.health_check().await;
    if !upstream {
        tracing::warn!("Readiness check failed: commerce platform unreachable");
    }

    let status = if upstream {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready: upstream,
            upstream,
        }),
    )
}

/// Prometheus text exposition.
///
/// # Errors
///
/// Returns 503 if no recorder is installed.
pub async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(metrics_exporter_prometheus::PrometheusHandle::render)
        .ok_or_else(|| AppError::unavailable("Metrics recorder not installed"))
}
