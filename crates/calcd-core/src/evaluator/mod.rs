//! # Expression Evaluator
//!
//! Computes the numeric value of a textual arithmetic expression.
//!
//! ## Pipeline
//!
//! ```text
//! text --> lexer::tokenize --> parser::parse --> ast::Expr --> Expr::eval --> f64
//! ```
//!
//! The whole input is parsed before anything is computed, so structural
//! errors (unbalanced parentheses, dangling operators) are always reported
//! in preference to arithmetic ones (division by zero).
//!
//! ## Semantics
//!
//! - `*` and `/` bind tighter than `+` and `-`
//! - Operators of equal precedence associate to the left
//! - Parentheses override precedence
//! - Unary minus applies to a literal or a sub-expression; unary plus does not exist
//! - Results are `f64`; division by zero and non-finite values are errors

pub mod ast;
pub mod lexer;
pub mod parser;

use thiserror::Error;

/// Reasons an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The input contains no tokens.
    #[error("empty expression")]
    EmptyExpression,

    /// A character that cannot start any token.
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter { found: char, offset: usize },

    /// A malformed number literal such as `1.` or `1.2.3`.
    #[error("invalid number '{literal}' at offset {offset}")]
    InvalidNumber { literal: String, offset: usize },

    /// A token where an operand or operator was required.
    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    /// Input ended where an operand was required.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A `(` without its matching `)`.
    #[error("unclosed parenthesis at offset {offset}")]
    UnclosedParenthesis { offset: usize },

    /// A `)` without a preceding `(`.
    #[error("unmatched closing parenthesis at offset {offset}")]
    UnmatchedParenthesis { offset: usize },

    /// Nesting deeper than the parser accepts.
    #[error("expression nesting exceeds maximum depth of {max}")]
    NestingTooDeep { max: usize },

    /// Division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A literal, intermediate or final value is not a finite number.
    #[error("result is not a finite number")]
    NonFinite,
}

/// Parse `text` into an expression tree without evaluating it.
pub fn parse_expression(text: &str) -> Result<ast::Expr, EvalError> {
    let tokens = lexer::tokenize(text)?;
    parser::parse(&tokens)
}

/// Evaluate `text` to a finite number.
///
/// Deterministic: identical input always yields an identical result or an
/// identical error. A zero result is always positive zero.
pub fn evaluate(text: &str) -> Result<f64, EvalError> {
    let value = parse_expression(text)?.eval()?;
    Ok(if value == 0.0 { 0.0 } else { value })
}

// =============================================================================
// TESTS
// =============================================================================
