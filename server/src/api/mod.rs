//! HTTP API endpoints.

pub mod dashboard;
pub mod vendors;
