//! Application state for the vendor portal HTTP server.
//!
//! Every collaborator is constructed once at startup and handed to the
//! handlers through this struct:
//! - Commerce API client (dashboard, readiness, category creation)
//! - Dashboard service
//! - Registration store and queue publisher, each optional
//! - Clock (review timestamps, submission timestamps)

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use vendor_portal_core::environment::Clock;
use vendor_portal_core::queue::QueuePublisher;
use vendor_portal_core::registration_store::RegistrationStore;
use vendor_portal_core::upstream::CommerceApi;
use vendor_portal_dashboard::DashboardService;
use vendor_portal_web::AppError;

use crate::config::RegistrationConfig;

/// Default topic for queued registrations.
pub const DEFAULT_VENDOR_TOPIC: &str = "vendor-requests";

/// Application state shared across all HTTP handlers.
///
/// It's cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Commerce platform client
    pub commerce: Arc<dyn CommerceApi>,

    /// Dashboard aggregation over `commerce`
    pub dashboard: DashboardService,

    /// Vendor request persistence, absent when no database is configured
    pub registrations: Option<Arc<dyn RegistrationStore>>,

    /// Registration queue, absent when no broker is configured
    pub queue: Option<Arc<dyn QueuePublisher>>,

    /// Topic queued registrations are published to
    pub queue_topic: String,

    /// Registration variant and fallback policy
    pub registration: RegistrationConfig,

    /// Time source
    pub clock: Arc<dyn Clock>,

    /// Prometheus renderer for `/metrics`
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state with only the commerce API wired in.
    ///
    /// The dashboard service shares `commerce` and `clock`.
    #[must_use]
    pub fn new(
        commerce: Arc<dyn CommerceApi>,
        clock: Arc<dyn Clock>,
        registration: RegistrationConfig,
    ) -> Self {
        Self {
            dashboard: DashboardService::new(Arc::clone(&commerce), Arc::clone(&clock)),
            commerce,
            registrations: None,
            queue: None,
            queue_topic: DEFAULT_VENDOR_TOPIC.to_string(),
            registration,
            clock,
            metrics: None,
        }
    }

    /// Attach the registration store.
    #[must_use]
    pub fn with_registrations(mut self, store: Arc<dyn RegistrationStore>) -> Self {
        self.registrations = Some(store);
        self
    }

    /// Attach the queue publisher and its topic.
    #[must_use]
    pub fn with_queue(mut self, queue: Arc<dyn QueuePublisher>, topic: impl Into<String>) -> Self {
        self.queue = Some(queue);
        self.queue_topic = topic.into();
        self
    }

    /// Attach the Prometheus handle.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// The registration store, or 503 for admin routes when none is configured.
    ///
    /// # Errors
    ///
    /// Returns a 503 [`AppError`] if no store is configured.
    pub fn require_registrations(&self) -> Result<&Arc<dyn RegistrationStore>, AppError> {
        self.registrations
            .as_ref()
            .ok_or_else(|| AppError::unavailable("Vendor registration storage is not configured"))
    }
}
