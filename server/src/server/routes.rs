//! Router configuration for the vendor portal.
//!
//! Builds the complete Axum router with all endpoints.

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use vendor_portal_web::{correlation_id_layer, handlers::health_check};

use super::health::{readiness_check, render_metrics};
use super::state::AppState;
use crate::api::{dashboard, vendors};

/// Build the complete Axum router.
///
/// Configures:
/// - Health, readiness and metrics
/// - Dashboard endpoint
/// - Vendor registration and admin endpoints
///
/// Layers, outermost first: correlation ID, CORS, request tracing.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/vendors/register", post(vendors::register_vendor))
        .route("/vendors", get(vendors::list_vendors))
        .route("/vendors/pending", get(vendors::list_pending))
        .route("/vendors/:id", get(vendors::get_vendor))
        .route("/vendors/:id/status", put(vendors::update_vendor_status));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(render_metrics))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .layer(correlation_id_layer())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let correlation = HeaderName::from_static("x-correlation-id");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, correlation.clone()])
        .expose_headers([correlation])
        .allow_credentials(true)
}
