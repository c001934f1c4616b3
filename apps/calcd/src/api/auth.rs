//! # Authentication Module
//!
//! Optional API key authentication for the calcd HTTP API.
//!
//! ## Configuration
//!
//! - `CALCD_API_KEY`: If set, every endpoint except `/health` requires this key
//!
//! ## Usage
//!
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CALCD_API_KEY";

/// Get API key from environment variable.
///
/// Returns `Some(key)` if `CALCD_API_KEY` is set and non-empty,
/// `None` otherwise (disabling authentication).
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
}

/// Compare a provided key with the expected one in constant time.
///
/// Both keys are padded to the same length so the comparison always runs
/// over the same number of bytes regardless of where they differ.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let max_len = provided.len().max(expected.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided.len()].copy_from_slice(provided);
    padded_expected[..expected.len()].copy_from_slice(expected);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided.len() == expected.len()
}

fn unauthorized(reason: &'static str) -> Response {
    tracing::warn!(event = "auth_failure", reason, "Authentication failed");
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("unauthorized", "Unauthorized")),
    )
        .into_response()
}

/// API key authentication middleware.
///
/// `/health` is always allowed (for load balancer checks). Other paths need
/// `Authorization: Bearer <key>`; a raw `<key>` is accepted too.
pub async fn api_key_auth_middleware(request: Request<Body>, next: Next) -> Response {
    let Some(expected) = get_api_key_from_env() else {
        return next.run(request).await;
    };

    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) => {
            let provided = value.strip_prefix("Bearer ").unwrap_or(value);
            if keys_match(provided, &expected) {
                next.run(request).await
            } else {
                unauthorized("invalid_api_key")
            }
        }
        None => unauthorized("missing_authorization_header"),
    }
}

// =============================================================================
// TESTS
// =============================================================================
