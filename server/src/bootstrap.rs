//! Wires collaborators from configuration.
//!
//! The commerce client is required. The registration store and the queue
//! publisher are optional: if one cannot be built the server still starts,
//! and the affected endpoints answer 503 (or follow `PERSISTENCE_FALLBACK`).

use std::sync::Arc;
use std::time::Duration;

use vendor_portal_core::environment::SystemClock;
use vendor_portal_core::queue::QueuePublisher;
use vendor_portal_core::registration_store::RegistrationStore;
use vendor_portal_jumpseller::JumpsellerClient;
use vendor_portal_postgres::PostgresRegistrationStore;
use vendor_portal_redpanda::RedpandaQueuePublisher;

use crate::config::{Config, PostgresConfig, RedpandaConfig, RegistrationMode};
use crate::server::AppState;

/// Build the application state from configuration.
///
/// # Errors
///
/// Returns an error if the commerce client cannot be constructed.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let client = JumpsellerClient::new(config.jumpseller.client_config(&config.store))?;
    tracing::info!(base_url = %client.base_url(), "Jumpseller client ready");

    let mut state = AppState::new(Arc::new(client), Arc::new(SystemClock), config.registration);

    if let Some(store) = connect_store(&config.postgres).await {
        state = state.with_registrations(store);
    }
    if let Some(queue) = connect_queue(&config.redpanda) {
        state = state.with_queue(queue, config.redpanda.topic.clone());
    }

    match config.registration.mode {
        RegistrationMode::Store if state.registrations.is_none() => tracing::warn!(
            fallback = ?config.registration.fallback,
            "Registration mode is 'store' but no store is available"
        ),
        RegistrationMode::Queue if state.queue.is_none() => tracing::warn!(
            "Registration mode is 'queue' but no broker is configured; registrations will fail"
        ),
        _ => {}
    }

    Ok(state)
}

async fn connect_store(config: &PostgresConfig) -> Option<Arc<dyn RegistrationStore>> {
    let url = config.url.as_deref()?;

    let store = match PostgresRegistrationStore::connect(url, config.max_connections).await {
        Ok(store) => store,
        Err(error) => {
            tracing::error!(
                error = %error,
                "Registration database unreachable, continuing without it"
            );
            return None;
        }
    };

    if config.run_migrations {
        if let Err(error) = store.migrate().await {
            tracing::error!(
                error = %error,
                "Registration migrations failed, continuing without store"
            );
            return None;
        }
        tracing::info!("Registration migrations applied");
    }

    Some(Arc::new(store))
}

fn connect_queue(config: &RedpandaConfig) -> Option<Arc<dyn QueuePublisher>> {
    let brokers = config.brokers.as_deref()?;

    match RedpandaQueuePublisher::builder()
        .brokers(brokers)
        .producer_acks(config.acks.clone())
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
    {
        Ok(publisher) => {
            tracing::info!(brokers = %brokers, topic = %config.topic, "Registration queue ready");
            Some(Arc::new(publisher))
        }
        Err(error) => {
            tracing::error!(error = %error, "Registration queue unavailable");
            None
        }
    }
}
