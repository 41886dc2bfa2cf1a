//! Configuration management for the vendor portal server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary calls `dotenvy::dotenv()` first, so a `.env` file works too.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use vendor_portal_core::commerce::StoreInfo;

/// Errors raised while reading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used
    #[error("Invalid value for {key}: {value:?} ({expected})")]
    Invalid {
        /// Environment variable name
        key: String,
        /// The offending value
        value: String,
        /// What would have been accepted
        expected: &'static str,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Jumpseller API configuration
    pub jumpseller: JumpsellerConfig,
    /// Static store descriptor reported on the dashboard
    pub store: StoreConfig,
    /// `PostgreSQL` configuration (registration store)
    pub postgres: PostgresConfig,
    /// RedPanda/Kafka configuration (registration queue)
    pub redpanda: RedpandaConfig,
    /// How registrations are handled
    pub registration: RegistrationConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Deployed frontend origin, allowed by CORS in addition to the dev servers
    pub frontend_url: Option<String>,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Jumpseller API configuration
#[derive(Clone, PartialEq, Eq)]
pub struct JumpsellerConfig {
    /// Store login
    pub login: String,
    /// API auth token
    pub auth_token: String,
    /// API root
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for JumpsellerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JumpsellerConfig")
            .field("login", &self.login)
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Static store descriptor. The commerce API has no store-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store display name
    pub name: String,
    /// ISO currency code
    pub currency: String,
    /// IANA timezone name
    pub timezone: String,
}

/// `PostgreSQL` configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Connection URL; the registration store is disabled when unset
    pub url: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

/// RedPanda/Kafka configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedpandaConfig {
    /// Broker addresses (comma-separated); the publisher is disabled when unset
    pub brokers: Option<String>,
    /// Topic receiving vendor registrations
    pub topic: String,
    /// Producer acknowledgement level
    pub acks: String,
    /// Delivery timeout in milliseconds
    pub timeout_ms: u64,
}

/// Registration handling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationConfig {
    /// Where registrations go
    pub mode: RegistrationMode,
    /// What to do when the store is unreachable
    pub fallback: PersistenceFallback,
}

/// Deployment variant for vendor registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationMode {
    /// Persist in the registration store, with duplicate detection
    #[default]
    Store,
    /// Publish to the registration topic
    Queue,
}

impl FromStr for RegistrationMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(Self::Store),
            "queue" => Ok(Self::Queue),
            _ => Err(()),
        }
    }
}

/// Behavior when the registration store reports it is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceFallback {
    /// Answer 503
    #[default]
    Fail,
    /// Acknowledge with `persisted: false`
    Mock,
}

impl FromStr for PersistenceFallback {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "mock" => Ok(Self::Mock),
            _ => Err(()),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            server: ServerConfig {
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse(&var, "PORT", 8000, "a port number")?,
                frontend_url: var("FRONTEND_URL"),
                shutdown_timeout: parse(&var, "SHUTDOWN_TIMEOUT", 30, "seconds")?,
            },
            jumpseller: JumpsellerConfig {
                login: var("JUMPSELLER_LOGIN").unwrap_or_default(),
                auth_token: var("JUMPSELLER_AUTH_TOKEN").unwrap_or_default(),
                base_url: var("JUMPSELLER_API_BASE_URL").unwrap_or_else(|| {
                    vendor_portal_jumpseller::config::DEFAULT_BASE_URL.to_string()
                }),
                timeout_secs: parse(&var, "JUMPSELLER_API_TIMEOUT", 30, "seconds")?,
            },
            store: StoreConfig {
                name: var("STORE_NAME").unwrap_or_else(|| "Made in Portugal".to_string()),
                currency: var("STORE_CURRENCY").unwrap_or_else(|| "EUR".to_string()),
                timezone: var("STORE_TIMEZONE").unwrap_or_else(|| "Europe/Lisbon".to_string()),
            },
            postgres: PostgresConfig {
                url: var("DATABASE_URL"),
                max_connections: parse(&var, "DATABASE_MAX_CONNECTIONS", 10, "a number")?,
                run_migrations: parse(&var, "DATABASE_RUN_MIGRATIONS", true, "true or false")?,
            },
            redpanda: RedpandaConfig {
                brokers: var("REDPANDA_BROKERS"),
                topic: var("REDPANDA_VENDOR_TOPIC")
                    .unwrap_or_else(|| "vendor-requests".to_string()),
                acks: var("REDPANDA_PRODUCER_ACKS").unwrap_or_else(|| "all".to_string()),
                timeout_ms: parse(&var, "REDPANDA_TIMEOUT_MS", 5000, "milliseconds")?,
            },
            registration: RegistrationConfig {
                mode: parse(&var, "REGISTRATION_MODE", RegistrationMode::Store, "store or queue")?,
                fallback: parse(
                    &var,
                    "PERSISTENCE_FALLBACK",
                    PersistenceFallback::Fail,
                    "fail or mock",
                )?,
            },
        })
    }

    /// Address the HTTP listener binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl JumpsellerConfig {
    /// Client settings combined with the static store descriptor.
    #[must_use]
    pub fn client_config(&self, store: &StoreConfig) -> vendor_portal_jumpseller::JumpsellerConfig {
        vendor_portal_jumpseller::JumpsellerConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            login: self.login.clone(),
            auth_token: self.auth_token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            store: store.info(),
        }
    }
}

impl StoreConfig {
    /// The descriptor served by the commerce client.
    #[must_use]
    pub fn info(&self) -> StoreInfo {
        StoreInfo {
            name: self.name.clone(),
            currency: self.currency.clone(),
            timezone: Some(self.timezone.clone()),
        }
    }
}

impl ServerConfig {
    /// Origins allowed by CORS.
    #[must_use]
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = vec![
            "http://localhost:5173".to_string(),
            "http://localhost:3000".to_string(),
        ];
        if let Some(frontend) = &self.frontend_url {
            origins.push(frontend.trim_end_matches('/').to_string());
        }
        origins
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
            expected,
        }),
    }
}
