//! Redpanda queue publisher for vendor registrations.
//!
//! This crate provides [`RedpandaQueuePublisher`], the production implementation
//! of the `QueuePublisher` trait from `vendor-portal-core`. It uses rdkafka, so
//! any Kafka-compatible broker works (Redpanda, Apache Kafka, MSK).
//!
//! In queue mode the registration endpoint does not persist anything itself: it
//! validates the submission, publishes it here and acknowledges. A downstream
//! consumer owns storage.
//!
//! ```text
//! POST /api/vendors/register
//!        │ validate
//!        ▼
//! ┌─────────────────┐
//! │    Redpanda     │
//! │ vendor-requests │◄─── JSON payload, keyed by email
//! └────────┬────────┘
//!          ▼
//!    downstream consumer
//! ```
//!
//! # Example
//!
//! ```no_run
//! use vendor_portal_redpanda::RedpandaQueuePublisher;
//! use vendor_portal_core::queue::QueuePublisher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let publisher = RedpandaQueuePublisher::new("localhost:9092")?;
//! let id = publisher
//!     .publish("vendor-requests", &serde_json::json!({"email": "a@b.pt"}))
//!     .await?;
//! println!("Published as {id}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use vendor_portal_core::queue::{QueueError, QueuePublisher};

/// Redpanda-backed [`QueuePublisher`].
///
/// Payloads are JSON-encoded. The message key is the payload's `email` field
/// when present, so every submission from one vendor lands on one partition.
///
/// # Example
///
/// ```no_run
/// use vendor_portal_redpanda::RedpandaQueuePublisher;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let publisher = RedpandaQueuePublisher::builder()
///     .brokers("localhost:9092,localhost:9093")
///     .producer_acks("all")  // Wait for all replicas
///     .compression("lz4")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RedpandaQueuePublisher {
    /// Kafka producer
    producer: FutureProducer,
    /// Broker addresses
    brokers: String,
    /// Delivery timeout
    timeout: Duration,
}

impl std::fmt::Debug for RedpandaQueuePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedpandaQueuePublisher")
            .field("brokers", &self.brokers)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RedpandaQueuePublisher {
    /// Create a publisher with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotConfigured`] if `brokers` is empty or the
    /// producer cannot be created.
    pub fn new(brokers: &str) -> Result<Self, QueueError> {
        Self::builder().brokers(brokers).build()
    }

    /// Create a new builder for configuring the publisher.
    #[must_use]
    pub fn builder() -> RedpandaQueuePublisherBuilder {
        RedpandaQueuePublisherBuilder::default()
    }

    /// Get a reference to the brokers string.
    #[must_use]
    pub fn brokers(&self) -> &str {
        &self.brokers
    }
}

/// Builder for configuring a [`RedpandaQueuePublisher`].
#[derive(Default, Debug)]
pub struct RedpandaQueuePublisherBuilder {
    brokers: Option<String>,
    producer_acks: Option<String>,
    compression: Option<String>,
    timeout: Option<Duration>,
}

impl RedpandaQueuePublisherBuilder {
    /// Set the broker addresses (comma-separated, e.g. `"localhost:9092"`).
    #[must_use]
    pub fn brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = Some(brokers.into());
        self
    }

    /// Set producer acknowledgment mode: `"0"`, `"1"` or `"all"`.
    ///
    /// Defaults to `"all"`; a lost registration cannot be recovered.
    #[must_use]
    pub fn producer_acks(mut self, acks: impl Into<String>) -> Self {
        self.producer_acks = Some(acks.into());
        self
    }

    /// Set compression: `"none"`, `"gzip"`, `"snappy"`, `"lz4"` or `"zstd"`.
    #[must_use]
    pub fn compression(mut self, compression: impl Into<String>) -> Self {
        self.compression = Some(compression.into());
        self
    }

    /// Set the delivery timeout (default 5 seconds).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the publisher.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotConfigured`] if brokers are not set or the
    /// producer cannot be created.
    pub fn build(self) -> Result<RedpandaQueuePublisher, QueueError> {
        let brokers = self
            .brokers
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| QueueError::NotConfigured("Brokers not configured".to_string()))?;
        let timeout = self.timeout.unwrap_or(Duration::from_secs(5));
        let acks = self.producer_acks.as_deref().unwrap_or("all");
        let compression = self.compression.as_deref().unwrap_or("none");

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .set("message.timeout.ms", timeout.as_millis().to_string())
            .set("acks", acks)
            .set("compression.type", compression)
            .create()
            .map_err(|e| QueueError::NotConfigured(format!("Failed to create producer: {e}")))?;

        tracing::info!(
            brokers = %brokers,
            acks,
            compression,
            "RedpandaQueuePublisher created"
        );

        Ok(RedpandaQueuePublisher {
            producer,
            brokers,
            timeout,
        })
    }
}

/// Partition key for a payload: its `email` field, if any.
fn message_key(payload: &Value) -> Option<String> {
    payload
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl QueuePublisher for RedpandaQueuePublisher {
    fn publish(
        &self,
        topic: &str,
        payload: &Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, QueueError>> + Send + '_>> {
        // Clone data before moving into async block
        let topic = topic.to_string();
        let key = message_key(payload);
        let encoded = serde_json::to_vec(payload);
        let timeout = self.timeout;

        Box::pin(async move {
            let bytes = encoded.map_err(|e| QueueError::Serialization(e.to_string()))?;

            let mut record: FutureRecord<'_, String, Vec<u8>> =
                FutureRecord::to(&topic).payload(&bytes);
            if let Some(key) = key.as_ref() {
                record = record.key(key);
            }

            match self.producer.send(record, Timeout::After(timeout)).await {
                Ok((partition, offset)) => {
                    tracing::info!(
                        topic = %topic,
                        partition,
                        offset,
                        "Registration published"
                    );
                    metrics::counter!("queue.published", "topic" => topic.clone()).increment(1);
                    Ok(format!("{topic}/{partition}/{offset}"))
                }
                Err((kafka_error, _)) => {
                    tracing::error!(
                        topic = %topic,
                        error = %kafka_error,
                        "Failed to publish registration"
                    );
                    metrics::counter!("queue.publish_failed", "topic" => topic.clone())
                        .increment(1);
                    Err(QueueError::PublishFailed {
                        topic,
                        reason: kafka_error.to_string(),
                    })
                }
            }
        })
    }
}
