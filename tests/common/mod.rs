//! Common test utilities
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

use account_ledger::api::{self, ApiKeyRegistry, AppState};
use account_ledger::rates::FixedRateLookup;
use account_ledger::service::LedgerService;
use account_ledger::store::InMemoryAccountStore;

pub const TEST_API_KEY: &str = "test_key_123";

/// Rate table used by conversion tests
pub fn test_rates() -> FixedRateLookup {
    FixedRateLookup::default()
        .with_rate("USD", dec!(1.1))
        .with_rate("EUR", dec!(1))
        .with_rate("JPY", dec!(160))
}

/// Full application backed by an empty in-memory store
pub fn setup_app() -> Router {
    let ledger = LedgerService::new(
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(test_rates()),
    );

    api::build_app(AppState::new(
        ledger,
        ApiKeyRegistry::from_keys([TEST_API_KEY]),
    ))
}

/// Send an authenticated request with an optional JSON body
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", TEST_API_KEY);

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Read the response body as JSON
pub async fn read_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Open an account and return its id
pub async fn create_account(app: &Router, name: &str) -> String {
    let response = send(app, "POST", "/api/v1/accounts", Some(serde_json::json!({ "name": name }))).await;
    assert_eq!(response.status(), StatusCode::OK, "account creation failed");

    read_json(response).await["id"].as_str().unwrap().to_string()
}

/// Decimal value of a JSON field serialized as a string
pub fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

/// Connect to the test database and bring its schema up to date
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    account_ledger::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
