//! # Core Type Definitions
//!
//! This module contains the core types shared by every calcd component:
//! - Record identifiers (`ExpressionId`)
//! - Stored outcomes (`ExpressionRecord`, `ExpressionStatus`)
//! - Error types (`CalcError`)
//!
//! ## Ownership
//!
//! Records are owned by the `ResultStore`. Every accessor hands out clones,
//! so no caller can reach into the store's map and mutate a record behind
//! the store's lock.

use crate::evaluator::EvalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// EXPRESSION IDENTIFIER
// =============================================================================

/// Opaque, unique identifier of a stored expression.
///
/// Generated once at creation and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpressionId(String);

impl ExpressionId {
    /// Wrap an existing identifier string (e.g. one taken from a request path).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random (v4 UUID) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpressionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// EXPRESSION STATUS
// =============================================================================

/// Lifecycle status of an expression record.
///
/// Submissions are evaluated synchronously, so the coordinator only ever
/// stores `Completed` records. `Pending` and `Failed` are part of the
/// record shape for clients that rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionStatus {
    Pending,
    Completed,
    Failed,
}

impl ExpressionStatus {
    /// Lowercase wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

// =============================================================================
// EXPRESSION RECORD
// =============================================================================

/// The stored outcome of one submitted expression.
///
/// Serializes as `{"id", "status", "result"}`. `error` only appears when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionRecord {
    /// Identifier under which the record is stored.
    pub id: ExpressionId,
    /// Lifecycle status.
    pub status: ExpressionStatus,
    /// Numeric result, present when `status` is `Completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    /// Failure detail, present when `status` is `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExpressionRecord {
    /// Create a record that has been evaluated successfully.
    #[must_use]
    pub fn completed(id: ExpressionId, result: f64) -> Self {
        Self {
            id,
            status: ExpressionStatus::Completed,
            result: Some(result),
            error: None,
        }
    }

    /// Create a record that has been accepted but not yet evaluated.
    #[must_use]
    pub fn pending(id: ExpressionId) -> Self {
        Self {
            id,
            status: ExpressionStatus::Pending,
            result: None,
            error: None,
        }
    }

    /// Create a record whose evaluation failed.
    #[must_use]
    pub fn failed(id: ExpressionId, error: impl Into<String>) -> Self {
        Self {
            id,
            status: ExpressionStatus::Failed,
            result: None,
            error: Some(error.into()),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the calcd system.
///
/// - No silent failures
/// - Use `Result<T, CalcError>` for fallible operations
/// - A missing record is not an error; lookups return `Option`
#[derive(Debug, Error)]
pub enum CalcError {
    /// The expression contains characters outside the accepted set.
    #[error("Invalid expression")]
    InvalidExpression,

    /// The expression exceeds the accepted input length.
    #[error("Expression length {length} exceeds maximum {max} bytes")]
    ExpressionTooLong { length: usize, max: usize },

    /// The expression passed validation but could not be evaluated.
    #[error("Failed to evaluate expression: {0}")]
    Evaluation(#[from] EvalError),

    /// A record with this id is already stored.
    #[error("Duplicate expression id: {0}")]
    DuplicateId(ExpressionId),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
