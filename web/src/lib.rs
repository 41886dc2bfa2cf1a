//! Axum integration for the vendor portal.
//!
//! Shared HTTP plumbing used by the server crate:
//!
//! - [`AppError`]: the handler error type, rendered as `{"detail", "code"}`
//!   JSON with conversions from every core seam error
//! - [`middleware::correlation_id_layer`]: per-request correlation IDs
//! - [`handlers::health_check`]: liveness
//!
//! # Example
//!
//! ```ignore
//! use vendor_portal_web::{AppError, correlation_id_layer, handlers::health_check};
//! use axum::{Router, routing::get};
//!
//! let app = Router::new()
//!     .route("/health", get(health_check))
//!     .layer(correlation_id_layer());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id_layer};
