//! Vendor Portal Server
//!
//! This binary:
//! - Loads `.env` and environment configuration
//! - Installs tracing and the Prometheus recorder
//! - Connects the Jumpseller client, registration store and queue
//! - Serves HTTP until Ctrl+C or SIGTERM
//!
//! # Usage
//!
//! ```bash
//! JUMPSELLER_LOGIN=... JUMPSELLER_AUTH_TOKEN=... cargo run --bin server
//! ```

use std::time::Duration;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vendor_portal_server::{Config, bootstrap, build_router, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vendor_portal=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vendor Portal Server...");

    let config = Config::from_env()?;
    info!(
        jumpseller = %config.jumpseller.base_url,
        registration_mode = ?config.registration.mode,
        database = config.postgres.url.is_some(),
        redpanda = ?config.redpanda.brokers,
        "Configuration loaded"
    );

    let prometheus = metrics::install_recorder()?;
    let state = bootstrap::build_state(&config).await?.with_metrics(prometheus);
    let app = build_router(state, &config.server.cors_origins());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "Vendor Portal Server listening");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    // Connections still open after the grace period are dropped.
    tokio::select! {
        result = server => result?,
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            error!(timeout_secs = shutdown_timeout.as_secs(), "Graceful shutdown timed out");
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
