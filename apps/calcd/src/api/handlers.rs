//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        CalculateRequest, CalculateResponse, ErrorResponse, ExpressionListResponse,
        ExpressionResponse, HealthResponse, error_code,
    },
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calcd_core::{CalcError, ExpressionId, QueryOutcome};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CALCULATE HANDLER
// =============================================================================

/// Submit an expression for evaluation.
///
/// The body is decoded from raw bytes so that a missing or wrong
/// `Content-Type` is reported the same way as malformed JSON: 422. A body
/// over the size limit is rejected the same way.
pub async fn calculate_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(
                event = "calculate_rejected",
                reason = "invalid_body",
                "Unreadable request body: {}",
                rejection.body_text()
            );
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::invalid_body(rejection.body_text())),
            )
                .into_response();
        }
    };

    let request: CalculateRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(
                event = "calculate_rejected",
                reason = "invalid_body",
                "Rejected request body: {}",
                e
            );
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::invalid_body(e)),
            )
                .into_response();
        }
    };

    match state.coordinator.submit(&request.expression) {
        Ok(id) => {
            tracing::info!(event = "expression_stored", id = %id, "Expression evaluated");
            (StatusCode::CREATED, Json(CalculateResponse::new(&id))).into_response()
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!(event = "calculate_failed", "Failed to store expression: {}", e);
            } else {
                tracing::warn!(
                    event = "calculate_rejected",
                    reason = error_code(&e),
                    "Rejected expression: {}",
                    e
                );
            }
            (status, Json(ErrorResponse::from_calc_error(&e))).into_response()
        }
    }
}

/// HTTP status for a failed submission.
fn status_for(err: &CalcError) -> StatusCode {
    match err {
        CalcError::InvalidExpression
        | CalcError::ExpressionTooLong { .. }
        | CalcError::Evaluation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CalcError::DuplicateId(_) | CalcError::ConfigError(_) | CalcError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// =============================================================================
// EXPRESSION QUERY HANDLERS
// =============================================================================

/// List every stored expression.
pub async fn list_expressions_handler(State(state): State<AppState>) -> Response {
    query_response(state.coordinator.query(None))
}

/// Fetch one stored expression by id.
pub async fn get_expression_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = ExpressionId::new(id);
    tracing::debug!(id = %id, "Expression lookup");
    query_response(state.coordinator.query(Some(&id)))
}

/// Translate a query outcome to its HTTP response.
fn query_response(outcome: QueryOutcome) -> Response {
    match outcome {
        QueryOutcome::All(expressions) => (
            StatusCode::OK,
            Json(ExpressionListResponse { expressions }),
        )
            .into_response(),
        QueryOutcome::Found(expression) => {
            (StatusCode::OK, Json(ExpressionResponse { expression })).into_response()
        }
        QueryOutcome::NotFound => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found())).into_response()
        }
    }
}
