//! # Expression Validator
//!
//! Character-set gate applied before evaluation.
//!
//! Accepts only ASCII digits, the four binary operators, parentheses and the
//! space character. This is not a grammar check: `"1 + + )"` passes here
//! and is rejected later by the evaluator.

use crate::primitives::OPERATORS;

/// Check that `text` contains only characters an expression may use.
///
/// Never panics and has no side effects. The empty string passes.
#[must_use]
pub fn validate(text: &str) -> bool {
    text.chars().all(is_valid_character)
}

/// Check a single character against the accepted set.
#[must_use]
pub fn is_valid_character(c: char) -> bool {
    c.is_ascii_digit() || OPERATORS.contains(&c) || matches!(c, '(' | ')' | ' ')
}

// =============================================================================
// TESTS
// =============================================================================
