//! HTTP API integration tests.
//!
//! Drives the full router (middleware included) with `tower::ServiceExt::oneshot`
//! against in-memory collaborators from `vendor-portal-testing`.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Integration tests can use expect for setup
#![allow(clippy::too_many_lines)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{Value, json};
use tower::ServiceExt;
use vendor_portal_core::commerce::{Order, Product, ProductQuery};
use vendor_portal_core::upstream::UpstreamError;
use vendor_portal_server::config::{PersistenceFallback, RegistrationConfig, RegistrationMode};
use vendor_portal_server::{AppState, build_router};
use vendor_portal_testing::{
    InMemoryQueuePublisher, InMemoryRegistrationStore, StubCall, StubCommerceApi, test_clock,
};

const STORE_MODE: RegistrationConfig = RegistrationConfig {
    mode: RegistrationMode::Store,
    fallback: PersistenceFallback::Fail,
};

fn state(api: &StubCommerceApi, registration: RegistrationConfig) -> AppState {
    AppState::new(Arc::new(api.clone()), Arc::new(test_clock()), registration)
}

fn app(state: AppState) -> Router {
    build_router(state, &["http://localhost:5173".to_string()])
}

fn store_app(api: &StubCommerceApi, store: &InMemoryRegistrationStore) -> Router {
    app(state(api, STORE_MODE).with_registrations(Arc::new(store.clone())))
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, value)
}

fn registration(email: &str) -> Value {
    json!({
        "name": "Olaria Velha",
        "owner_name": "Joana Reis",
        "email": email,
        "country": "PT",
        "questions": [
            {
                "question_id": "q1",
                "question_text": "Where are your products made?",
                "answer": "Barcelos"
            }
        ],
        "documents": ["nif.pdf"]
    })
}

fn orders() -> Vec<Order> {
    serde_json::from_value(json!([
        {"id": 10, "status": "paid", "created_at": "2024-12-31 10:00:00 UTC", "total": 25,
         "customer": {"name": "Rui"}, "line_items": [{"price": 25}]},
        {"id": 11, "status": "pending", "created_at": "2024-12-31 20:00:00", "total": 8}
    ]))
    .unwrap()
}

fn products() -> Vec<Product> {
    serde_json::from_value(json!([{"id": 1, "status": "active"}])).unwrap()
}

// ============================================================================
// Health, readiness, metrics
// ============================================================================

#[tokio::test]
async fn health_reports_ok_with_correlation_id() {
    let api = StubCommerceApi::new();
    let request = Request::builder()
        .uri("/health")
        .header("X-Correlation-ID", "req-1")
        .body(Body::empty())
        .unwrap();

    let response = app(state(&api, STORE_MODE)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("X-Correlation-ID").unwrap(), "req-1");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn readiness_follows_upstream() {
    let healthy = StubCommerceApi::new().with_products(products());
    let (status, body) = send(app(state(&healthy, STORE_MODE)), Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ready": true, "upstream": true}));
    assert_eq!(healthy.calls(), vec![StubCall::ListProducts(ProductQuery::limit(1))]);

    let broken = StubCommerceApi::new().fail_products(UpstreamError::Unauthorized);
    let (status, body) = send(app(state(&broken, STORE_MODE)), Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
}

#[tokio::test]
async fn metrics_endpoint_needs_a_recorder() {
    let api = StubCommerceApi::new();
    let (status, _) = send(app(state(&api, STORE_MODE)), Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let handle = PrometheusBuilder::new().build_recorder().handle();
    let with_metrics = state(&api, STORE_MODE).with_metrics(handle);
    let (status, _) = send(app(with_metrics), Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn dashboard_returns_snapshot() {
    let api = StubCommerceApi::new()
        .with_orders(orders())
        .with_products(products());

    let (status, body) = send(
        app(state(&api, STORE_MODE)),
        Method::GET,
        "/api/dashboard?period=weekly",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["period"], "weekly");
    assert_eq!(body["store_info"]["name"], "Test Store");
    assert_eq!(body["stats"]["orders"]["total_orders"], 2);
    assert_eq!(body["stats"]["orders"]["new_orders"], 1);
    assert_eq!(body["stats"]["products"]["active_products"], 1);
    assert_eq!(body["recent_orders"][0]["customer"], "Rui");
    assert_eq!(body["quick_actions"].as_array().unwrap().len(), 4);
    assert_eq!(body["degraded_sections"], json!([]));
}

#[tokio::test]
async fn dashboard_defaults_to_daily() {
    let api = StubCommerceApi::new();
    let (status, body) = send(
        app(state(&api, STORE_MODE)),
        Method::GET,
        "/api/dashboard",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "daily");
}

#[tokio::test]
async fn dashboard_store_failure_is_503() {
    let api = StubCommerceApi::new()
        .with_orders(orders())
        .fail_store_info(UpstreamError::Timeout);

    let (status, body) = send(
        app(state(&api, STORE_MODE)),
        Method::GET,
        "/api/dashboard",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Unable to connect to Jumpseller API")
    );
}

#[tokio::test]
async fn dashboard_degraded_section_still_200() {
    let api = StubCommerceApi::new().fail_products(UpstreamError::Transport("reset".to_string()));

    let (status, body) = send(
        app(state(&api, STORE_MODE)),
        Method::GET,
        "/api/dashboard",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["degraded_sections"], json!(["products"]));
    assert_eq!(body["stats"]["products"]["total_products"], 0);
}

#[tokio::test]
async fn dashboard_rejects_unknown_period() {
    let api = StubCommerceApi::new();
    let (status, body) = send(
        app(state(&api, STORE_MODE)),
        Method::GET,
        "/api/dashboard?period=hourly",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(api.calls().is_empty());
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_stores_pending_request() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();

    let (status, body) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(registration("  Joana@Example.com ")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["email"], "joana@example.com");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["reviewed_at"], Value::Null);
    assert_eq!(body["persisted"], true);
    assert!(body["message"].is_string());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn duplicate_pending_email_conflicts() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();

    let (first, _) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(registration("joana@example.com")),
    )
    .await;
    let (second, body) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(registration("JOANA@example.com")),
    )
    .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn registration_validation() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();

    let mut no_questions = registration("a@example.com");
    no_questions["questions"] = json!([]);
    let (status, body) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(no_questions),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "At least one verification question must be answered");

    let mut blank_owner = registration("a@example.com");
    blank_owner["owner_name"] = json!("   ");
    let (status, _) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(blank_owner),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(registration("not-an-email")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(json!({"name": "Only a name", "email": "a@example.com", "questions": []})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert!(store.is_empty());
}

#[tokio::test]
async fn unavailable_store_follows_fallback_policy() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::unavailable();

    let (status, body) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(registration("joana@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");

    let mock = RegistrationConfig {
        mode: RegistrationMode::Store,
        fallback: PersistenceFallback::Mock,
    };
    let (status, body) = send(
        app(state(&api, mock).with_registrations(Arc::new(store.clone()))),
        Method::POST,
        "/api/vendors/register",
        Some(registration("joana@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["persisted"], false);
    assert!(body.get("id").is_none());

    // No store at all behaves like an unavailable one.
    let (status, body) = send(
        app(state(&api, mock)),
        Method::POST,
        "/api/vendors/register",
        Some(registration("joana@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["persisted"], false);
}

#[tokio::test]
async fn queue_mode_publishes_submission() {
    let api = StubCommerceApi::new();
    let queue = InMemoryQueuePublisher::new();
    let config = RegistrationConfig {
        mode: RegistrationMode::Queue,
        fallback: PersistenceFallback::Fail,
    };

    let (status, body) = send(
        app(state(&api, config).with_queue(Arc::new(queue.clone()), "vendor-signups")),
        Method::POST,
        "/api/vendors/register",
        Some(registration("joana@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("id").is_none());
    assert_eq!(body["status"], "pending");

    let published = queue.published();
    assert_eq!(published.len(), 1);
    let (topic, payload) = &published[0];
    assert_eq!(topic, "vendor-signups");
    assert_eq!(payload["email"], "joana@example.com");
    assert_eq!(payload["questions"][0]["answer"], "Barcelos");
    assert!(payload["submitted_at"].is_string());
}

#[tokio::test]
async fn queue_failures_are_loud() {
    let api = StubCommerceApi::new();
    let config = RegistrationConfig {
        mode: RegistrationMode::Queue,
        fallback: PersistenceFallback::Mock,
    };

    let (status, _) = send(
        app(state(&api, config)),
        Method::POST,
        "/api/vendors/register",
        Some(registration("joana@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(
        app(state(&api, config)
            .with_queue(Arc::new(InMemoryQueuePublisher::failing()), "vendor-requests")),
        Method::POST,
        "/api/vendors/register",
        Some(registration("joana@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Admin
// ============================================================================

async fn seeded(api: &StubCommerceApi, store: &InMemoryRegistrationStore) {
    for email in ["joana@example.com", "rui@example.com"] {
        let mut body = registration(email);
        if email.starts_with("rui") {
            body["name"] = json!("Cortiça Viva");
        }
        let (status, _) = send(
            store_app(api, store),
            Method::POST,
            "/api/vendors/register",
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn approval_sets_review_and_creates_category() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();
    seeded(&api, &store).await;

    let (status, body) = send(
        store_app(&api, &store),
        Method::PUT,
        "/api/vendors/2/status",
        Some(json!({
            "status": "approved",
            "admin_notes": "Great cork",
            "reviewer": "admin@portal"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["reviewer"], "admin@portal");
    assert_eq!(body["admin_notes"], "Great cork");
    assert!(body["reviewed_at"].is_string());
    assert_eq!(api.created_categories(), vec!["Cortiça Viva".to_string()]);

    let (_, pending) = send(
        store_app(&api, &store),
        Method::GET,
        "/api/vendors/pending",
        None,
    )
    .await;
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["email"], "joana@example.com");
}

#[tokio::test]
async fn approval_survives_category_failure() {
    let api = StubCommerceApi::new().fail_create_category(UpstreamError::Api {
        status: 422,
        body: Some(json!({"errors": {"name": ["has already been taken"]}})),
    });
    let store = InMemoryRegistrationStore::new();
    seeded(&api, &store).await;

    let (status, body) = send(
        store_app(&api, &store),
        Method::PUT,
        "/api/vendors/1/status",
        Some(json!({"status": "approved"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(api.created_categories().len(), 1);
}

#[tokio::test]
async fn rejection_skips_category() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();
    seeded(&api, &store).await;

    let (status, body) = send(
        store_app(&api, &store),
        Method::PUT,
        "/api/vendors/1/status",
        Some(json!({"status": "rejected", "admin_notes": "Imported goods"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert!(api.created_categories().is_empty());

    // A rejected email can register again.
    let (status, _) = send(
        store_app(&api, &store),
        Method::POST,
        "/api/vendors/register",
        Some(registration("joana@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn status_update_errors() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();
    seeded(&api, &store).await;

    let (status, _) = send(
        store_app(&api, &store),
        Method::PUT,
        "/api/vendors/1/status",
        Some(json!({"status": "archived"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        store_app(&api, &store),
        Method::PUT,
        "/api/vendors/99/status",
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(api.created_categories().is_empty());
}

#[tokio::test]
async fn listing_and_lookup() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();
    seeded(&api, &store).await;

    let (status, all) = send(store_app(&api, &store), Method::GET, "/api/vendors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, approved) = send(
        store_app(&api, &store),
        Method::GET,
        "/api/vendors?status=approved",
        None,
    )
    .await;
    assert_eq!(approved, json!([]));

    let (status, _) = send(
        store_app(&api, &store),
        Method::GET,
        "/api/vendors?status=lost",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, one) = send(store_app(&api, &store), Method::GET, "/api/vendors/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["name"], "Olaria Velha");
    assert_eq!(one["questions"][0]["question_id"], "q1");

    let (status, _) = send(store_app(&api, &store), Method::GET, "/api/vendors/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_routes_need_a_store() {
    let api = StubCommerceApi::new();
    for uri in ["/api/vendors", "/api/vendors/pending", "/api/vendors/1"] {
        let (status, body) = send(app(state(&api, STORE_MODE)), Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    }
}

#[tokio::test]
async fn reapproval_does_not_recreate_category() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();
    seeded(&api, &store).await;

    for _ in 0..2 {
        let (status, body) = send(
            store_app(&api, &store),
            Method::PUT,
            "/api/vendors/1/status",
            Some(json!({"status": "approved"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "approved");
    }
    assert_eq!(api.created_categories(), vec!["Olaria Velha".to_string()]);

    // Rejected then approved again counts as a fresh approval.
    send(
        store_app(&api, &store),
        Method::PUT,
        "/api/vendors/1/status",
        Some(json!({"status": "rejected"})),
    )
    .await;
    send(
        store_app(&api, &store),
        Method::PUT,
        "/api/vendors/1/status",
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(api.created_categories().len(), 2);
}

#[tokio::test]
async fn non_numeric_id_is_a_json_bad_request() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();

    let (status, body) = send(store_app(&api, &store), Method::GET, "/api/vendors/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PATH_PARAMETER");
    assert!(body["detail"].is_string());

    let (status, body) = send(
        store_app(&api, &store),
        Method::PUT,
        "/api/vendors/abc/status",
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PATH_PARAMETER");
    assert!(api.created_categories().is_empty());
}

#[tokio::test]
async fn registration_carries_caller_correlation_id() {
    let api = StubCommerceApi::new();
    let store = InMemoryRegistrationStore::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/vendors/register")
        .header("content-type", "application/json")
        .header("X-Correlation-ID", "signup-7")
        .body(Body::from(registration("joana@example.com").to_string()))
        .unwrap();

    let response = store_app(&api, &store).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers().get("X-Correlation-ID").unwrap(), "signup-7");
    assert_eq!(store.len(), 1);
}
