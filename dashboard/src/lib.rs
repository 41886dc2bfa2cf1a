//! # Vendor Portal Dashboard
//!
//! Aggregates the vendor dashboard from the commerce platform.
//!
//! ```text
//!                 ┌── list_orders(100) ──► order stats      (degradable)
//!                 ├── list_products(50) ─► product stats    (degradable)
//! snapshot() ─────┼── list_orders(5) ────► recent orders    (degradable)
//!   join!         ├── store_info() ──────► store descriptor (critical)
//!                 └── list_orders(n) ────► sales chart      (degradable)
//! ```
//!
//! All five calls run concurrently and are awaited together; a failing branch
//! never cancels its siblings. A degradable branch that fails is replaced by a
//! zero-valued fallback and listed in `degraded_sections`. A store-info
//! failure fails the whole request.

pub mod chart;
pub mod dates;
pub mod error;
pub mod period;
pub mod quick_actions;
pub mod recent;
pub mod service;
pub mod stats;

pub use error::DashboardError;
pub use period::Period;
pub use service::{DashboardService, DashboardSnapshot, Section, SectionName};
