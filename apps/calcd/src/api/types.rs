//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use calcd_core::{CalcError, EvalError, ExpressionId, ExpressionRecord};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CALCULATE REQUEST/RESPONSE
// =============================================================================

/// Expression submission request.
///
/// Unknown fields are ignored; a missing or non-string `expression` makes
/// the body unparseable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub expression: String,
}

/// Expression submission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub id: String,
}

impl CalculateResponse {
    pub fn new(id: &ExpressionId) -> Self {
        Self {
            id: id.to_string(),
        }
    }
}

// =============================================================================
// EXPRESSION QUERY RESPONSES
// =============================================================================

/// All stored expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionListResponse {
    pub expressions: Vec<ExpressionRecord>,
}

/// A single stored expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionResponse {
    pub expression: ExpressionRecord,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable kind.
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: &str, msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: code.to_string(),
        }
    }

    pub fn invalid_body(detail: impl std::fmt::Display) -> Self {
        Self::new("invalid_body", format!("Invalid request body: {}", detail))
    }

    pub fn not_found() -> Self {
        Self::new("not_found", "Expression not found")
    }

    /// Map a core error to its client-visible body.
    pub fn from_calc_error(err: &CalcError) -> Self {
        Self::new(error_code(err), err.to_string())
    }
}

/// Stable error kind for a core error.
pub fn error_code(err: &CalcError) -> &'static str {
    match err {
        CalcError::InvalidExpression => "invalid_expression",
        CalcError::ExpressionTooLong { .. } => "expression_too_long",
        CalcError::Evaluation(EvalError::DivisionByZero) => "division_by_zero",
        CalcError::Evaluation(_) => "evaluation_failed",
        CalcError::DuplicateId(_) | CalcError::ConfigError(_) | CalcError::IoError(_) => {
            "internal"
        }
    }
}
