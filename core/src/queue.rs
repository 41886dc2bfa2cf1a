//! Fire-and-forget publishing of registration payloads.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when publishing to the queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// No broker or topic is configured
    #[error("Queue publisher not configured: {0}")]
    NotConfigured(String),

    /// The payload could not be encoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The broker rejected or did not acknowledge the message
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },
}

/// Publishes JSON payloads to a topic.
///
/// Publishing fails loudly: an unconfigured or unreachable broker is an error,
/// never a silent drop.
pub trait QueuePublisher: Send + Sync {
    /// Publish a payload and return the broker-assigned message id.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::PublishFailed`] if the broker does not accept the message.
    fn publish(
        &self,
        topic: &str,
        payload: &Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, QueueError>> + Send + '_>>;
}
