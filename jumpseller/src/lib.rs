//! # Jumpseller API Client
//!
//! Typed client for the Jumpseller REST API. Responses are normalized into the
//! records defined in `vendor_portal_core::commerce`; failures surface as
//! [`UpstreamError`].
//!
//! ## Example
//!
//! ```no_run
//! use vendor_portal_core::commerce::OrderQuery;
//! use vendor_portal_jumpseller::{JumpsellerClient, JumpsellerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JumpsellerClient::new(JumpsellerConfig {
//!         login: "my-store".to_string(),
//!         auth_token: "secret".to_string(),
//!         ..JumpsellerConfig::default()
//!     })?;
//!
//!     let orders = client.list_orders(OrderQuery::limit(10)).await?;
//!     println!("{} recent orders", orders.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Limitations
//!
//! Jumpseller exposes no store endpoint, so [`JumpsellerClient::store_info`]
//! returns the static descriptor from [`JumpsellerConfig::store`].

pub mod client;
pub mod config;
mod normalize;

pub use client::JumpsellerClient;
pub use config::JumpsellerConfig;
pub use vendor_portal_core::upstream::UpstreamError;
