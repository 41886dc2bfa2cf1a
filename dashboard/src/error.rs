//! Error types for dashboard aggregation

use thiserror::Error;
use vendor_portal_core::upstream::UpstreamError;

/// Errors that abort a dashboard request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// The store descriptor could not be fetched
    #[error("Failed to get store info: {0}")]
    StoreInfo(#[source] UpstreamError),

    /// The requested chart period is not one of `daily`, `weekly`, `monthly`
    #[error("Invalid period '{0}'. Expected one of: daily, weekly, monthly")]
    UnknownPeriod(String),
}
