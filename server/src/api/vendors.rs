//! Vendor registration API endpoints.
//!
//! Public:
//! - POST /api/vendors/register - Submit a registration
//!
//! Admin:
//! - GET /api/vendors?status= - List requests
//! - GET /api/vendors/pending - List pending requests
//! - GET /api/vendors/:id - Get one request
//! - PUT /api/vendors/:id/status - Approve or reject

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vendor_portal_core::commerce::NewCategory;
use vendor_portal_core::queue::QueueError;
use vendor_portal_core::registration_store::{RegistrationStore, StoreError};
use vendor_portal_core::vendor::{
    NewVendorRequest, Review, VendorAnswer, VendorRequest, VendorStatus, normalize_email,
};
use vendor_portal_web::{AppError, CorrelationId};

use crate::config::{PersistenceFallback, RegistrationMode};
use crate::server::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Registration form submitted by a prospective vendor.
#[derive(Debug, Deserialize)]
pub struct RegisterVendorRequest {
    /// Business name
    pub name: String,
    /// Owner's full name
    pub owner_name: String,
    /// Contact email
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
    /// Country
    pub country: Option<String>,
    /// Tax identifier
    pub tax_id: Option<String>,
    /// Website
    pub website: Option<String>,
    /// Free-text description
    pub about: Option<String>,
    /// Verification answers
    pub questions: Vec<VendorAnswer>,
    /// Uploaded document references
    pub documents: Option<Vec<String>>,
}

/// Acknowledgment of a registration.
#[derive(Debug, Serialize)]
pub struct RegisterVendorResponse {
    /// Stored id; absent when queued or not persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Business name
    pub name: String,
    /// Owner's full name
    pub owner_name: String,
    /// Normalized contact email
    pub email: String,
    /// Always `pending`
    pub status: VendorStatus,
    /// When the registration was received
    pub submitted_at: DateTime<Utc>,
    /// Always `null` for a new registration
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Human-readable outcome
    pub message: String,
    /// Whether the registration was stored or queued
    pub persisted: bool,
}

/// Query parameters for listing vendor requests.
#[derive(Debug, Default, Deserialize)]
pub struct ListVendorsQuery {
    /// Filter by status
    pub status: Option<String>,
}

/// Admin decision on a request.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// `approved` or `rejected`
    pub status: String,
    /// Notes for the record
    pub admin_notes: Option<String>,
    /// Reviewer identity
    pub reviewer: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new vendor.
///
/// Depending on `REGISTRATION_MODE` the request is stored (with duplicate
/// detection) or published to the registration topic.
///
/// # Errors
///
/// - 400 if no question was answered or a name is blank
/// - 409 if a pending request already exists for the email
/// - 422 if the email is malformed or the body is missing fields
/// - 503 if the store or queue is unavailable (store mode honors `PERSISTENCE_FALLBACK`)
pub async fn register_vendor(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    payload: Result<Json<RegisterVendorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterVendorResponse>), AppError> {
    let Json(payload) = payload?;
    let request = validate(payload, state.clock.now())?;

    let result = match state.registration.mode {
        RegistrationMode::Store => register_in_store(&state, request).await,
        RegistrationMode::Queue => register_in_queue(&state, request).await,
    };

    let outcome = match &result {
        Ok(response) if response.persisted => "accepted",
        Ok(_) => "mocked",
        Err(error) if error.status() == StatusCode::CONFLICT => "duplicate",
        Err(_) => "failed",
    };
    metrics::counter!("vendor_registrations", "outcome" => outcome).increment(1);
    tracing::info!(
        correlation_id = %correlation_id,
        mode = ?state.registration.mode,
        outcome,
        "Vendor registration handled"
    );

    result.map(|response| (StatusCode::CREATED, Json(response)))
}

/// List vendor requests, optionally filtered by status.
///
/// # Errors
///
/// - 400 for an unknown status
/// - 503 if no store is configured or it is unreachable
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(query): Query<ListVendorsQuery>,
) -> Result<Json<Vec<VendorRequest>>, AppError> {
    let store = state.require_registrations()?;
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            VendorStatus::parse(&s.to_ascii_lowercase()).map_err(|_| {
                AppError::bad_request(format!(
                    "Invalid status '{s}'. Expected one of: pending, approved, rejected"
                ))
            })
        })
        .transpose()?;

    Ok(Json(store.list_by_status(status).await?))
}

/// List requests awaiting review.
///
/// # Errors
///
/// Returns 503 if no store is configured or it is unreachable.
pub async fn list_pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<VendorRequest>>, AppError> {
    let store = state.require_registrations()?;
    Ok(Json(store.list_by_status(Some(VendorStatus::Pending)).await?))
}

/// Get one vendor request.
///
/// # Errors
///
/// - 404 if no request has this id
/// - 503 if no store is configured or it is unreachable
pub async fn get_vendor(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<VendorRequest>, AppError> {
    let Path(id) = id?;
    let store = state.require_registrations()?;
    store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Vendor request", id))
}

/// Approve or reject a vendor request.
///
/// A first approval also creates a storefront category named after the
/// business. That call is best-effort: its failure is logged and the approval
/// stands. Re-approving an approved request leaves the category alone.
///
/// # Errors
///
/// - 400 if `status` is not `approved` or `rejected`, or the id is not a number
/// - 404 if no request has this id
/// - 503 if no store is configured or it is unreachable
pub async fn update_vendor_status(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<VendorRequest>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let store = state.require_registrations()?;

    let status = match payload.status.trim().to_ascii_lowercase().as_str() {
        "approved" => VendorStatus::Approved,
        "rejected" => VendorStatus::Rejected,
        other => {
            return Err(AppError::bad_request(format!(
                "Invalid status '{other}'. Expected 'approved' or 'rejected'"
            )));
        }
    };

    let previous = store
        .get(id)
        .await?
        .map(|existing| existing.status)
        .ok_or_else(|| AppError::not_found("Vendor request", id))?;

    let record = store
        .update_status(
            id,
            Review {
                status,
                admin_notes: payload.admin_notes,
                reviewer: payload.reviewer,
                reviewed_at: state.clock.now(),
            },
        )
        .await?;

    tracing::info!(
        vendor_request_id = record.id,
        status = %record.status,
        reviewer = ?record.reviewer,
        "Vendor request reviewed"
    );

    if record.status == VendorStatus::Approved && previous == VendorStatus::Approved {
        tracing::debug!(
            vendor_request_id = record.id,
            "Request was already approved, category not recreated"
        );
    } else if record.status == VendorStatus::Approved {
        match state
            .commerce
            .create_category(NewCategory::named(record.name.clone()))
            .await
        {
            Ok(category) => tracing::info!(
                vendor_request_id = record.id,
                category_id = ?category.id,
                "Created vendor category"
            ),
            Err(error) => {
                metrics::counter!("vendor_category.create_failed").increment(1);
                tracing::warn!(
                    vendor_request_id = record.id,
                    error = %error,
                    "Failed to create vendor category, approval kept"
                );
            }
        }
    }

    Ok(Json(record))
}

// ============================================================================
// Helpers
// ============================================================================

fn validate(
    payload: RegisterVendorRequest,
    submitted_at: DateTime<Utc>,
) -> Result<NewVendorRequest, AppError> {
    if payload.questions.is_empty() {
        return Err(AppError::bad_request(
            "At least one verification question must be answered",
        ));
    }
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Business name is required"));
    }
    let owner_name = payload.owner_name.trim();
    if owner_name.is_empty() {
        return Err(AppError::bad_request("Owner name is required"));
    }
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        return Err(AppError::validation(format!(
            "'{}' is not a valid email address",
            payload.email.trim()
        )));
    }

    Ok(NewVendorRequest {
        name: name.to_string(),
        owner_name: owner_name.to_string(),
        email,
        phone: non_blank(payload.phone),
        country: non_blank(payload.country),
        tax_id: non_blank(payload.tax_id),
        website: non_blank(payload.website),
        about: non_blank(payload.about),
        questions: payload.questions,
        documents: payload.documents.unwrap_or_default(),
        submitted_at,
    })
}

/// `local@domain.tld`, no whitespace, a dot inside the domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn acknowledgment(
    request: &NewVendorRequest,
    id: Option<i64>,
    message: &str,
    persisted: bool,
) -> RegisterVendorResponse {
    RegisterVendorResponse {
        id,
        name: request.name.clone(),
        owner_name: request.owner_name.clone(),
        email: request.email.clone(),
        status: VendorStatus::Pending,
        submitted_at: request.submitted_at,
        reviewed_at: None,
        message: message.to_string(),
        persisted,
    }
}

async fn register_in_store(
    state: &AppState,
    request: NewVendorRequest,
) -> Result<RegisterVendorResponse, AppError> {
    let stored = match &state.registrations {
        Some(store) => insert_unique(store.as_ref(), request.clone()).await,
        None => Err(StoreError::Unavailable(
            "no registration store configured".to_string(),
        )),
    };

    match stored {
        Ok(record) => {
            tracing::info!(
                vendor_request_id = record.id,
                email = %record.email,
                "Vendor registration stored"
            );
            Ok(acknowledgment(
                &request,
                Some(record.id),
                "Registration submitted successfully",
                true,
            ))
        }
        Err(StoreError::Unavailable(reason))
            if state.registration.fallback == PersistenceFallback::Mock =>
        {
            tracing::warn!(
                email = %request.email,
                reason = %reason,
                "Registration store unavailable, acknowledging without persisting"
            );
            Ok(acknowledgment(
                &request,
                None,
                "Registration received but could not be saved; please contact support if you do not hear back",
                false,
            ))
        }
        Err(error) => Err(error.into()),
    }
}

async fn insert_unique(
    store: &dyn RegistrationStore,
    request: NewVendorRequest,
) -> Result<VendorRequest, StoreError> {
    if store.find_pending_by_email(&request.email).await?.is_some() {
        return Err(StoreError::DuplicatePending {
            email: request.email,
        });
    }
    store.insert(request).await
}

async fn register_in_queue(
    state: &AppState,
    request: NewVendorRequest,
) -> Result<RegisterVendorResponse, AppError> {
    let queue = state.queue.as_ref().ok_or_else(|| {
        QueueError::NotConfigured("no broker configured for vendor registrations".to_string())
    })?;
    let payload =
        serde_json::to_value(&request).map_err(|e| QueueError::Serialization(e.to_string()))?;

    let message_id = queue.publish(&state.queue_topic, &payload).await?;
    tracing::info!(
        topic = %state.queue_topic,
        message_id = %message_id,
        email = %request.email,
        "Vendor registration queued"
    );

    Ok(acknowledgment(
        &request,
        None,
        "Registration submitted successfully",
        true,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+shop@mail.example.pt"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("ana@example..com"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana smith@example.com"));
    }

    #[test]
    fn blank_optionals_are_dropped() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" PT ".to_string())), Some("PT".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
