//! # Vendor Portal Core
//!
//! Domain records and collaborator traits shared by every vendor portal crate.
//!
//! This crate provides:
//! - Typed upstream commerce records ([`commerce::Order`], [`commerce::Product`], ...)
//!   decoded leniently from the platform's inconsistently-shaped JSON
//! - Vendor registration records ([`vendor::VendorRequest`] and friends)
//! - The collaborator seams the services are written against:
//!   - [`upstream::CommerceApi`] - the third-party commerce platform
//!   - [`registration_store::RegistrationStore`] - persistence of vendor requests
//!   - [`queue::QueuePublisher`] - fire-and-forget event queue
//! - The [`environment::Clock`] abstraction so time windows are testable
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │   HTTP handlers      │ ───▶ │  DashboardService    │
//! └─────────┬────────────┘      └──────────┬───────────┘
//!           │                              │
//!           ▼                              ▼
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │ RegistrationStore /  │      │     CommerceApi      │
//! │   QueuePublisher     │      │  (Jumpseller, stub)  │
//! └──────────────────────┘      └──────────────────────┘
//! ```
//!
//! Every trait returns `Pin<Box<dyn Future>>` so implementations can be held
//! as `Arc<dyn Trait>` and injected once at process start.

pub mod commerce;
pub mod lenient;
pub mod queue;
pub mod registration_store;
pub mod upstream;
pub mod vendor;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

/// Environment module - injected dependencies that are not collaborators.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic windows
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system wall clock.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
