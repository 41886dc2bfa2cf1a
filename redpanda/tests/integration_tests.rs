//! Integration tests for [`RedpandaQueuePublisher`] with a real Kafka instance.
//!
//! # Running These Tests
//!
//! These tests are marked as `#[ignore]` because they require Docker and take
//! 15-60 seconds to spin up Kafka.
//!
//! ```bash
//! cargo test -p vendor-portal-redpanda --test integration_tests -- --ignored
//! ```

#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use serde_json::json;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::kafka::{KAFKA_PORT, Kafka};
use vendor_portal_core::queue::QueuePublisher;
use vendor_portal_redpanda::RedpandaQueuePublisher;

/// Publish until the broker accepts, which also auto-creates the topic.
async fn wait_for_kafka_ready(publisher: &RedpandaQueuePublisher, topic: &str) {
    let max_attempts = 60;
    for attempt in 1..=max_attempts {
        if publisher.publish(topic, &json!({"warmup": true})).await.is_ok() {
            tokio::time::sleep(Duration::from_secs(2)).await;
            return;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(
            attempt != max_attempts,
            "Kafka failed to become ready after {max_attempts} attempts"
        );
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_published_registration_is_consumable() {
    let kafka = Kafka::default()
        .with_env_var("KAFKA_AUTO_CREATE_TOPICS_ENABLE", "true")
        .start()
        .await
        .expect("Failed to start Kafka container");

    let host = kafka.get_host().await.expect("Failed to get host");
    let port = kafka
        .get_host_port_ipv4(KAFKA_PORT)
        .await
        .expect("Failed to get port");
    let brokers = format!("{host}:{port}");

    let publisher = RedpandaQueuePublisher::builder()
        .brokers(&brokers)
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create publisher");
    wait_for_kafka_ready(&publisher, "vendor-requests").await;

    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("group.id", "vendor-requests-test")
        .set("auto.offset.reset", "earliest")
        .set("enable.partition.eof", "false")
        .create()
        .expect("Failed to create consumer");
    consumer
        .subscribe(&["vendor-requests"])
        .expect("Failed to subscribe");

    let payload = json!({
        "name": "Olaria Velha",
        "email": "joana@example.com",
        "questions": [{"question_id": "q1", "question_text": "Origin?", "answer": "Porto"}]
    });
    let id = publisher
        .publish("vendor-requests", &payload)
        .await
        .expect("Failed to publish");
    assert!(id.starts_with("vendor-requests/"));

    let received = tokio::time::timeout(Duration::from_secs(20), async {
        loop {
            let message = consumer.recv().await.expect("Consumer error");
            let body: serde_json::Value =
                serde_json::from_slice(message.payload().expect("payload")).expect("json");
            if body.get("warmup").is_none() {
                let key = message.key().map(|k| String::from_utf8_lossy(k).to_string());
                return (key, body);
            }
        }
    })
    .await
    .expect("Timed out waiting for message");

    assert_eq!(received.0.as_deref(), Some("joana@example.com"));
    assert_eq!(received.1, payload);
}

#[tokio::test]
async fn test_unreachable_broker_fails_loudly() {
    let publisher = RedpandaQueuePublisher::builder()
        .brokers("127.0.0.1:1")
        .timeout(Duration::from_millis(500))
        .build()
        .expect("builder should not connect eagerly");

    let result = publisher
        .publish("vendor-requests", &json!({"email": "x@example.com"}))
        .await;

    assert!(result.is_err(), "publish to an unreachable broker must fail");
}
