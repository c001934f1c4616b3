//! # Fixed Limits
//!
//! Hardcoded runtime constants for the calcd core.
//!
//! These are compiled into the binary and are immutable at runtime. They
//! bound the work a single request can cause, so every operation stays
//! computationally bounded regardless of input.

/// Operator characters accepted by the validator.
pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Maximum accepted expression length in bytes.
///
/// Longer submissions are rejected by the coordinator before validation.
pub const MAX_EXPRESSION_LENGTH: usize = 64 * 1024;

/// Maximum nesting depth of the recursive-descent parser.
///
/// Both parentheses and unary minus add one level. Deeper input is
/// reported as an evaluation error instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Number of ids the coordinator tries before giving up on an insert.
pub const MAX_ID_ATTEMPTS: usize = 3;
