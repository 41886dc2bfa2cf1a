//! `PostgreSQL` registration store for the vendor portal.
//!
//! This crate provides [`PostgresRegistrationStore`], the production
//! implementation of the `RegistrationStore` trait from `vendor-portal-core`.
//! It uses sqlx with a connection pool and embeds its migrations.
//!
//! The one-pending-request-per-email rule is enforced twice: the HTTP layer
//! checks before inserting, and a partial unique index on
//! `lower(email) WHERE status = 'pending'` closes the race between two
//! concurrent submissions.
//!
//! # Example
//!
//! ```ignore
//! use vendor_portal_postgres::PostgresRegistrationStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresRegistrationStore::connect("postgres://localhost/vendors", 5).await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

mod registration_store;

pub use registration_store::PostgresRegistrationStore;
