//! The commerce platform seam.
//!
//! [`CommerceApi`] is the narrow interface the dashboard aggregation and the
//! admin approval flow are written against. The production implementation is
//! `JumpsellerClient`; tests use a scripted stub.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use thiserror::Error;

use crate::commerce::{Category, NewCategory, Order, OrderQuery, Product, ProductQuery, StoreInfo};

/// Errors that can occur when calling the commerce platform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// 401 from the platform
    #[error("Authentication failed. Check your login and auth token.")]
    Unauthorized,

    /// 404 from the platform
    #[error("Resource not found.")]
    NotFound,

    /// The request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Connection, DNS or TLS failure
    #[error("Request error: {0}")]
    Transport(String),

    /// Any other non-2xx response
    #[error("API request failed with status {status}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Parsed error body, if the platform returned JSON
        body: Option<Value>,
    },

    /// A 2xx response whose body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}

impl UpstreamError {
    /// HTTP status code associated with this error, if one was received.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Timeout | Self::Transport(_) | Self::ResponseParseFailed(_) => None,
        }
    }

    /// Parsed error body returned by the platform, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Boxed future returned by [`CommerceApi`] operations.
pub type UpstreamFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, UpstreamError>> + Send + 'a>>;

/// Boxed future returned by [`CommerceApi::health_check`].
pub type HealthFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// Typed access to the commerce platform.
///
/// # Dyn Compatibility
///
/// Methods return `Pin<Box<dyn Future>>` so the client can be shared as
/// `Arc<dyn CommerceApi>` between the dashboard service and HTTP handlers.
pub trait CommerceApi: Send + Sync {
    /// List orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] if the platform call fails.
    fn list_orders(&self, query: OrderQuery) -> UpstreamFuture<'_, Vec<Order>>;

    /// List products.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] if the platform call fails.
    fn list_products(&self, query: ProductQuery) -> UpstreamFuture<'_, Vec<Product>>;

    /// Describe the store.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] if the store cannot be described.
    fn store_info(&self) -> UpstreamFuture<'_, StoreInfo>;

    /// Create a product category.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] if the platform call fails.
    fn create_category(&self, category: NewCategory) -> UpstreamFuture<'_, Category>;

    /// Whether the platform answers with the configured credentials.
    ///
    /// Backs the readiness endpoint. The default lists a single product.
    fn health_check(&self) -> HealthFuture<'_> {
        Box::pin(async move {
            match self.list_products(ProductQuery::limit(1)).await {
                Ok(_) => true,
                Err(error) => {
                    tracing::warn!(%error, "Commerce platform health check failed");
                    false
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_codes_are_exposed() {
        assert_eq!(UpstreamError::Unauthorized.status_code(), Some(401));
        assert_eq!(UpstreamError::NotFound.status_code(), Some(404));
        assert_eq!(UpstreamError::Timeout.status_code(), None);
        let err = UpstreamError::Api {
            status: 422,
            body: Some(json!({"message": "invalid"})),
        };
        assert_eq!(err.status_code(), Some(422));
        assert_eq!(err.body(), Some(&json!({"message": "invalid"})));
        assert_eq!(err.to_string(), "API request failed with status 422");
    }
}
