//! # calcd HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/calculate` - Submit an expression (201 with its id, 422 on failure)
//! - `GET /api/v1/expressions` - List every stored expression
//! - `GET /api/v1/expressions/{id}` - Fetch one expression (404 if unknown)
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `CALCD_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `CALCD_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `CALCD_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{API_KEY_ENV, get_api_key_from_env};
pub use handlers::{
    calculate_handler, get_expression_handler, health_handler, list_expressions_handler,
};
pub use middleware::{RATE_LIMIT_ENV, create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    CalculateRequest, CalculateResponse, ErrorResponse, ExpressionListResponse,
    ExpressionResponse, HealthResponse,
};

use crate::config::Config;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use calcd_core::{CalcError, Coordinator};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body (1 MiB).
const MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state. The coordinator synchronizes its own store.
#[derive(Clone, Default)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    /// Create new app state around a coordinator.
    #[must_use]
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from `CALCD_CORS_ORIGINS`.
///
/// - `*`: allows all origins
/// - unset, or no valid entry: localhost only
/// - otherwise: the comma-separated list of origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("CALCD_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins (CALCD_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins in CALCD_CORS_ORIGINS, using localhost");
                build_localhost_cors()
            } else {
                restrict(CorsLayer::new().allow_origin(allowed_origins))
            }
        }
        None => {
            tracing::debug!("CORS: No CALCD_CORS_ORIGINS set, using localhost");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    restrict(CorsLayer::new().allow_origin(origins))
}

fn restrict(layer: CorsLayer) -> CorsLayer {
    layer
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState) -> Router {
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = create_rate_limiter(rate_limit);
    match rate_limiter {
        Some(_) => tracing::info!("Rate limiting enabled: {} requests/second", rate_limit),
        None => tracing::info!("Rate limiting disabled"),
    }

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication disabled; set {} to require a Bearer token",
            API_KEY_ENV
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/v1/calculate", post(handlers::calculate_handler))
        .route(
            "/api/v1/expressions",
            get(handlers::list_expressions_handler),
        )
        .route(
            "/api/v1/expressions/{id}",
            get(handlers::get_expression_handler),
        );

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(addr: &str, config: &Config) -> Result<(), CalcError> {
    // Distributed-execution knobs are accepted for compatibility only.
    tracing::debug!(
        computing_power = config.computing_power,
        time_addition_ms = config.time_addition_ms,
        time_subtraction_ms = config.time_subtraction_ms,
        time_multiplication_ms = config.time_multiplication_ms,
        time_division_ms = config.time_division_ms,
        "Execution settings loaded (evaluation is synchronous; these have no effect)"
    );

    let router = create_router(AppState::default());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CalcError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("calcd HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CalcError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
