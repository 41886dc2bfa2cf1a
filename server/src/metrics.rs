//! Metrics for the vendor portal.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `dashboard.requests{outcome}` - Dashboard builds by outcome (ok, unavailable)
//! - `dashboard.section.degraded{section}` - Sections replaced by their fallback
//! - `vendor_registrations{outcome}` - Registrations (accepted, mocked, duplicate, failed)
//! - `vendor_requests.created` / `vendor_requests.reviewed` - Store writes
//! - `vendor_category.create_failed` - Category creation failures on approval
//! - `queue.published` / `queue.publish_failed` - Queue deliveries

use metrics::describe_counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and describe all metrics.
///
/// Call once at startup, before any metric is recorded.
///
/// # Errors
///
/// Returns [`BuildError`] if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// Register descriptions for every counter the portal emits.
pub fn register_metrics() {
    describe_counter!(
        "dashboard.requests",
        "Dashboard builds by outcome (ok, unavailable)"
    );
    describe_counter!(
        "dashboard.section.degraded",
        "Dashboard sections that fell back to zero values, by section"
    );
    describe_counter!(
        "vendor_registrations",
        "Vendor registrations by outcome (accepted, mocked, duplicate, failed)"
    );
    describe_counter!("vendor_requests.created", "Vendor requests stored");
    describe_counter!("vendor_requests.reviewed", "Vendor requests approved or rejected");
    describe_counter!(
        "vendor_category.create_failed",
        "Category creations that failed after an approval"
    );
    describe_counter!("queue.published", "Registration payloads delivered to the queue");
    describe_counter!("queue.publish_failed", "Registration payloads the queue rejected");
}
