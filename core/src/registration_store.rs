//! Persistence seam for vendor requests.
//!
//! The store is a single-table CRUD boundary. It upholds one invariant: at most
//! one request per (normalized) email may be `pending` at a time.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::vendor::{NewVendorRequest, Review, VendorRequest, VendorStatus};

/// Errors that can occur during registration store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing database cannot be reached
    #[error("Registration store unavailable: {0}")]
    Unavailable(String),

    /// A pending request already exists for this email
    #[error("A pending registration already exists for {email}")]
    DuplicatePending {
        /// The conflicting email
        email: String,
    },

    /// No request with this id
    #[error("Vendor request {0} not found")]
    NotFound(i64),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(String),
}

/// Boxed future returned by [`RegistrationStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// CRUD access to vendor requests.
///
/// # Dyn Compatibility
///
/// Methods return `Pin<Box<dyn Future>>` so the store can be held as
/// `Arc<dyn RegistrationStore>` in application state.
pub trait RegistrationStore: Send + Sync {
    /// Find the pending request for an email, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] or [`StoreError::Database`] on failure.
    fn find_pending_by_email(&self, email: &str) -> StoreFuture<'_, Option<VendorRequest>>;

    /// Insert a new request in `pending` status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicatePending`] if the email already has a pending request.
    fn insert(&self, request: NewVendorRequest) -> StoreFuture<'_, VendorRequest>;

    /// Fetch a request by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] or [`StoreError::Database`] on failure.
    fn get(&self, id: i64) -> StoreFuture<'_, Option<VendorRequest>>;

    /// List requests, optionally filtered by status, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] or [`StoreError::Database`] on failure.
    fn list_by_status(&self, status: Option<VendorStatus>) -> StoreFuture<'_, Vec<VendorRequest>>;

    /// Apply an admin review atomically and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no request has this id.
    fn update_status(&self, id: i64, review: Review) -> StoreFuture<'_, VendorRequest>;
}
