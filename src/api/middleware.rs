//! API Middleware
//!
//! Authentication and request logging middleware.

use std::collections::HashSet;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::OperationContext;
use crate::error::AppError;

use super::AppState;

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// SHA-256 hex digest of a raw API key
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}

/// Accepted API keys, stored as SHA-256 hex digests
#[derive(Debug, Clone, Default)]
pub struct ApiKeyRegistry {
    hashes: HashSet<String>,
}

impl ApiKeyRegistry {
    pub fn new<I, S>(hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hashes: hashes
                .into_iter()
                .map(|hash| hash.as_ref().trim().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Registry accepting the given raw keys
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(keys.into_iter().map(|key| hash_api_key(key.as_ref())))
    }

    /// Returns a short fingerprint of the key's digest when the key is accepted
    pub fn verify(&self, api_key: &str) -> Option<String> {
        let hash = hash_api_key(api_key);
        if self.hashes.contains(&hash) {
            Some(hash[..8].to_string())
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

// =========================================================================
// API Key Authentication Middleware
// =========================================================================

/// Validate the X-API-Key header and record the key's fingerprint on the context
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::MissingApiKey.into_response())?;

    let fingerprint = state.api_keys.verify(api_key).ok_or_else(|| {
        tracing::warn!("Rejected request with unknown API key");
        AppError::InvalidApiKey.into_response()
    })?;

    let context = request
        .extensions()
        .get::<OperationContext>()
        .cloned()
        .unwrap_or_default()
        .with_api_key(fingerprint);

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["x-api-key", "authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Correlation ID from the request header, or a fresh one
fn correlation_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
///
/// Runs before authentication so rejected requests are logged too. The
/// correlation ID is echoed back in the response headers.
pub async fn logging_middleware(mut request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let headers = mask_headers_for_logging(request.headers());
    let correlation_id = correlation_id(request.headers());

    request
        .extensions_mut()
        .insert(OperationContext::new().with_correlation_id(correlation_id));

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = %correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = %correlation_id,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}
