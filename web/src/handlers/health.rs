//! Liveness endpoint.
//!
//! Used by load balancers to verify the process is up. It checks no
//! dependencies; readiness lives with the application router.

use axum::Json;
use serde::Serialize;

/// Liveness response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Liveness {
    /// Always `"ok"`
    pub status: &'static str,
}

/// Simple health check endpoint (for basic liveness).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "ok"
/// }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}
