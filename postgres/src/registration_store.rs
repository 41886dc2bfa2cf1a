//! sqlx implementation of `RegistrationStore`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use vendor_portal_core::registration_store::{RegistrationStore, StoreError, StoreFuture};
use vendor_portal_core::vendor::{
    NewVendorRequest, Review, VendorAnswer, VendorRequest, VendorStatus, normalize_email,
};

const COLUMNS: &str = "id, name, owner_name, email, phone, country, tax_id, website, about, \
     questions, documents, status, admin_notes, reviewer, submitted_at, reviewed_at";

/// `PostgreSQL`-backed store for vendor requests.
///
/// # Example
///
/// ```no_run
/// use vendor_portal_postgres::PostgresRegistrationStore;
/// use vendor_portal_core::registration_store::RegistrationStore;
/// use vendor_portal_core::vendor::VendorStatus;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = PostgresRegistrationStore::from_pool(pool);
///
/// let pending = store.list_by_status(Some(VendorStatus::Pending)).await?;
/// println!("Pending requests: {}", pending.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PostgresRegistrationStore {
    pool: PgPool,
}

impl PostgresRegistrationStore {
    /// Create a store from an existing connection pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the database cannot be reached.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to connect: {e}")))?;

        tracing::info!(max_connections, "Connected to registration database");
        Ok(Self::from_pool(pool))
    }

    /// Run the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_sqlx_error(error: sqlx::Error, email: Option<&str>) -> StoreError {
    match error {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicatePending {
            email: email.unwrap_or_default().to_string(),
        },
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(error.to_string()),
        other => StoreError::Database(other.to_string()),
    }
}

fn row_to_request(row: &PgRow) -> Result<VendorRequest, StoreError> {
    let column = |e: sqlx::Error| StoreError::Database(format!("Failed to decode row: {e}"));

    let status: String = row.try_get("status").map_err(column)?;
    let Json(questions): Json<Vec<VendorAnswer>> = row.try_get("questions").map_err(column)?;
    let Json(documents): Json<Vec<String>> = row.try_get("documents").map_err(column)?;
    let submitted_at: DateTime<Utc> = row.try_get("submitted_at").map_err(column)?;
    let reviewed_at: Option<DateTime<Utc>> = row.try_get("reviewed_at").map_err(column)?;

    Ok(VendorRequest {
        id: row.try_get("id").map_err(column)?,
        name: row.try_get("name").map_err(column)?,
        owner_name: row.try_get("owner_name").map_err(column)?,
        email: row.try_get("email").map_err(column)?,
        phone: row.try_get("phone").map_err(column)?,
        country: row.try_get("country").map_err(column)?,
        tax_id: row.try_get("tax_id").map_err(column)?,
        website: row.try_get("website").map_err(column)?,
        about: row.try_get("about").map_err(column)?,
        questions,
        documents,
        status: VendorStatus::parse(&status)?,
        admin_notes: row.try_get("admin_notes").map_err(column)?,
        reviewer: row.try_get("reviewer").map_err(column)?,
        submitted_at,
        reviewed_at,
    })
}

impl RegistrationStore for PostgresRegistrationStore {
    fn find_pending_by_email(&self, email: &str) -> StoreFuture<'_, Option<VendorRequest>> {
        let email = normalize_email(email);
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM vendor_requests \
                 WHERE lower(email) = $1 AND status = 'pending' \
                 LIMIT 1"
            ))
            .bind(&email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

            row.as_ref().map(row_to_request).transpose()
        })
    }

    fn insert(&self, request: NewVendorRequest) -> StoreFuture<'_, VendorRequest> {
        Box::pin(async move {
            let email = normalize_email(&request.email);
            let row = sqlx::query(&format!(
                "INSERT INTO vendor_requests \
                 (name, owner_name, email, phone, country, tax_id, website, about, \
                  questions, documents, status, submitted_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending', $11) \
                 RETURNING {COLUMNS}"
            ))
            .bind(&request.name)
            .bind(&request.owner_name)
            .bind(&email)
            .bind(&request.phone)
            .bind(&request.country)
            .bind(&request.tax_id)
            .bind(&request.website)
            .bind(&request.about)
            .bind(Json(&request.questions))
            .bind(Json(&request.documents))
            .bind(request.submitted_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, Some(&email)))?;

            let record = row_to_request(&row)?;

            tracing::info!(id = record.id, email = %record.email, "Vendor request stored");
            metrics::counter!("vendor_requests.created").increment(1);

            Ok(record)
        })
    }

    fn get(&self, id: i64) -> StoreFuture<'_, Option<VendorRequest>> {
        Box::pin(async move {
            let row = sqlx::query(&format!("SELECT {COLUMNS} FROM vendor_requests WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, None))?;

            row.as_ref().map(row_to_request).transpose()
        })
    }

    fn list_by_status(&self, status: Option<VendorStatus>) -> StoreFuture<'_, Vec<VendorRequest>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM vendor_requests \
                 WHERE ($1::TEXT IS NULL OR status = $1) \
                 ORDER BY submitted_at ASC, id ASC"
            ))
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?;

            rows.iter().map(row_to_request).collect()
        })
    }

    fn update_status(&self, id: i64, review: Review) -> StoreFuture<'_, VendorRequest> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "UPDATE vendor_requests \
                 SET status = $2, admin_notes = $3, reviewer = $4, reviewed_at = $5 \
                 WHERE id = $1 \
                 RETURNING {COLUMNS}"
            ))
            .bind(id)
            .bind(review.status.as_str())
            .bind(&review.admin_notes)
            .bind(&review.reviewer)
            .bind(review.reviewed_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, None))?
            .ok_or(StoreError::NotFound(id))?;

            let record = row_to_request(&row)?;

            tracing::info!(id, status = %record.status, "Vendor request reviewed");
            metrics::counter!("vendor_requests.reviewed", "status" => record.status.as_str())
                .increment(1);

            Ok(record)
        })
    }
}
