//! Client configuration.

use std::time::Duration;

use vendor_portal_core::commerce::StoreInfo;

/// Default Jumpseller API root.
pub const DEFAULT_BASE_URL: &str = "https://api.jumpseller.com/v1";

/// Connection settings for [`crate::JumpsellerClient`].
#[derive(Debug, Clone)]
pub struct JumpsellerConfig {
    /// API root, without a trailing `/`
    pub base_url: String,
    /// Store login
    pub login: String,
    /// API auth token
    pub auth_token: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Static store descriptor
    pub store: StoreInfo,
}

impl Default for JumpsellerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login: String::new(),
            auth_token: String::new(),
            timeout: Duration::from_secs(30),
            store: default_store(),
        }
    }
}

/// The descriptor reported when no store settings are configured.
#[must_use]
pub fn default_store() -> StoreInfo {
    StoreInfo {
        name: "Made in Portugal".to_string(),
        currency: "EUR".to_string(),
        timezone: Some("Europe/Lisbon".to_string()),
    }
}
