//! Dashboard API endpoint.
//!
//! - GET /api/dashboard?period=daily|weekly|monthly

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use vendor_portal_dashboard::{DashboardSnapshot, Period};
use vendor_portal_web::AppError;

use crate::server::state::AppState;

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Chart period; `daily` when absent
    pub period: Option<String>,
}

/// Build the dashboard in one call.
///
/// # Errors
///
/// - 400 if `period` is not one of `daily`, `weekly`, `monthly`
/// - 503 if the store descriptor cannot be fetched
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let period = match query.period.as_deref().map(str::trim) {
        None | Some("") => Period::default(),
        Some(raw) => raw
            .to_ascii_lowercase()
            .parse::<Period>()
            .map_err(|e| AppError::bad_request(e.to_string()))?,
    };

    match state.dashboard.snapshot(period).await {
        Ok(snapshot) => {
            metrics::counter!("dashboard.requests", "outcome" => "ok").increment(1);
            if !snapshot.degraded_sections.is_empty() {
                tracing::info!(
                    period = %period,
                    degraded = snapshot.degraded_sections.len(),
                    "Dashboard served with degraded sections"
                );
            }
            Ok(Json(snapshot))
        }
        Err(error) => {
            metrics::counter!("dashboard.requests", "outcome" => "unavailable").increment(1);
            Err(
                AppError::unavailable(format!("Unable to connect to Jumpseller API: {error}"))
                    .with_source(error.into()),
            )
        }
    }
}
