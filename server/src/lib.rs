//! Vendor Portal Server - backend-for-frontend for Jumpseller vendors
//!
//! Serves two things to the vendor portal frontend:
//!
//! - **Dashboard**: one call that fans out to the commerce platform and
//!   returns store info, order and product statistics, recent orders, a sales
//!   chart and quick actions. Non-critical sections degrade independently.
//! - **Vendor registration**: public submission, then admin approval or
//!   rejection. Submissions are stored (with one pending request per email)
//!   or published to a queue, depending on `REGISTRATION_MODE`.
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────────────────────────────────────┐
//!  HTTP ─────▶ │ correlation id ▶ CORS ▶ trace ▶ router   │
//!              └──────┬──────────────────────┬────────────┘
//!                     │                      │
//!             ┌───────▼────────┐    ┌────────▼─────────┐
//!             │DashboardService│    │  vendors handlers │
//!             └───────┬────────┘    └───┬──────────┬───┘
//!                     │                 │          │
//!             ┌───────▼────────┐ ┌──────▼─────┐ ┌──▼──────────┐
//!             │  CommerceApi   │ │Registration│ │QueuePublisher│
//!             │  (Jumpseller)  │ │Store (PG)  │ │ (Redpanda)  │
//!             └────────────────┘ └────────────┘ └─────────────┘
//! ```
//!
//! All collaborators are built once in [`bootstrap::build_state`] and injected
//! through [`server::AppState`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod metrics;
pub mod server;

pub use config::Config;
pub use server::{AppState, build_router};
