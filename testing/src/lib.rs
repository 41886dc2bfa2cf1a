//! # Vendor Portal Testing
//!
//! Testing utilities for the vendor portal.
//!
//! This crate provides:
//! - [`FixedClock`]: deterministic time
//! - [`StubCommerceApi`]: scripted commerce platform with failure injection
//! - [`InMemoryRegistrationStore`]: vendor request store without a database
//! - [`InMemoryQueuePublisher`]: captures published payloads
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use vendor_portal_testing::{StubCommerceApi, test_clock};
//! use vendor_portal_core::upstream::{CommerceApi, UpstreamError};
//!
//! let api = StubCommerceApi::new().fail_store_info(UpstreamError::Timeout);
//! let api: Arc<dyn CommerceApi> = Arc::new(api);
//! let clock = test_clock();
//! # let _ = (api, clock);
//! ```

pub mod commerce_mocks;
pub mod store_mocks;

use chrono::{DateTime, Utc};
use vendor_portal_core::environment::Clock;

/// Mock implementations of Environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use vendor_portal_testing::mocks::FixedClock;
    /// use vendor_portal_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::TimeDelta::days(20_089))
    }
}

// Re-export commonly used items
pub use commerce_mocks::{StubCall, StubCommerceApi};
pub use mocks::{FixedClock, test_clock};
pub use store_mocks::{InMemoryQueuePublisher, InMemoryRegistrationStore};
