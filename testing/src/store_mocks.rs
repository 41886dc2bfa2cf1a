//! In-memory registration store and queue publisher.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only happens if a test already panicked

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use vendor_portal_core::queue::{QueueError, QueuePublisher};
use vendor_portal_core::registration_store::{RegistrationStore, StoreError, StoreFuture};
use vendor_portal_core::vendor::{
    NewVendorRequest, Review, VendorRequest, VendorStatus, normalize_email,
};

/// In-memory vendor request store.
///
/// Enforces the one-pending-request-per-email rule like the Postgres store
/// does. [`InMemoryRegistrationStore::set_available`] simulates an outage.
#[derive(Clone, Debug)]
pub struct InMemoryRegistrationStore {
    rows: Arc<RwLock<Vec<VendorRequest>>>,
    available: Arc<AtomicBool>,
}

impl Default for InMemoryRegistrationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRegistrationStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A store whose every call fails with [`StoreError::Unavailable`].
    #[must_use]
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_available(false);
        store
    }

    /// Toggle simulated availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Whether the store holds no requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()))
        }
    }
}

impl RegistrationStore for InMemoryRegistrationStore {
    fn find_pending_by_email(&self, email: &str) -> StoreFuture<'_, Option<VendorRequest>> {
        let email = normalize_email(email);
        Box::pin(async move {
            self.check()?;
            Ok(self
                .rows
                .read()
                .unwrap()
                .iter()
                .find(|r| r.status == VendorStatus::Pending && normalize_email(&r.email) == email)
                .cloned())
        })
    }

    fn insert(&self, request: NewVendorRequest) -> StoreFuture<'_, VendorRequest> {
        Box::pin(async move {
            self.check()?;
            let mut rows = self.rows.write().unwrap();
            let email = normalize_email(&request.email);
            if rows
                .iter()
                .any(|r| r.status == VendorStatus::Pending && normalize_email(&r.email) == email)
            {
                return Err(StoreError::DuplicatePending { email });
            }
            let id = i64::try_from(rows.len()).unwrap() + 1;
            let record = VendorRequest::from_new(id, request);
            rows.push(record.clone());
            Ok(record)
        })
    }

    fn get(&self, id: i64) -> StoreFuture<'_, Option<VendorRequest>> {
        Box::pin(async move {
            self.check()?;
            Ok(self.rows.read().unwrap().iter().find(|r| r.id == id).cloned())
        })
    }

    fn list_by_status(&self, status: Option<VendorStatus>) -> StoreFuture<'_, Vec<VendorRequest>> {
        Box::pin(async move {
            self.check()?;
            Ok(self
                .rows
                .read()
                .unwrap()
                .iter()
                .filter(|r| status.is_none_or(|s| r.status == s))
                .cloned()
                .collect())
        })
    }

    fn update_status(&self, id: i64, review: Review) -> StoreFuture<'_, VendorRequest> {
        Box::pin(async move {
            self.check()?;
            let mut rows = self.rows.write().unwrap();
            let record = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::NotFound(id))?;
            record.apply_review(review);
            Ok(record.clone())
        })
    }
}

/// Publisher that records every payload in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryQueuePublisher {
    published: Arc<RwLock<Vec<(String, Value)>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryQueuePublisher {
    /// Create a publisher that accepts everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher that rejects every message.
    #[must_use]
    pub fn failing() -> Self {
        let publisher = Self::new();
        publisher.failing.store(true, Ordering::SeqCst);
        publisher
    }

    /// `(topic, payload)` pairs published so far.
    #[must_use]
    pub fn published(&self) -> Vec<(String, Value)> {
        self.published.read().unwrap().clone()
    }
}

impl QueuePublisher for InMemoryQueuePublisher {
    fn publish(
        &self,
        topic: &str,
        payload: &Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, QueueError>> + Send + '_>> {
        let topic = topic.to_string();
        let payload = payload.clone();
        Box::pin(async move {
            if self.failing.load(Ordering::SeqCst) {
                return Err(QueueError::PublishFailed {
                    topic,
                    reason: "in-memory publisher marked failing".to_string(),
                });
            }
            let mut published = self.published.write().unwrap();
            let offset = published.len();
            published.push((topic.clone(), payload));
            Ok(format!("{topic}/0/{offset}"))
        })
    }
}
