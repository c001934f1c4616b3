//! Expression tree produced by the parser.
//!
//! Runs of operators at the same precedence level are stored flat in a
//! `Chain` and folded left to right. Tree depth is therefore bounded by
//! the nesting depth of the source, not by its length.

use super::EvalError;

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Apply the operator. Division by zero is an error, never infinity.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
        let value = match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => {
                if rhs == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                lhs / rhs
            }
        };
        finite(value)
    }
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Unary minus.
    Negate(Box<Expr>),
    /// `first op1 rest1 op2 rest2 ...`, evaluated left-associatively.
    Chain {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
}

impl Expr {
    /// Evaluate the tree to a finite number.
    pub fn eval(&self) -> Result<f64, EvalError> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Negate(inner) => Ok(-inner.eval()?),
            Self::Chain { first, rest } => rest
                .iter()
                .try_fold(first.eval()?, |acc, (op, rhs)| op.apply(acc, rhs.eval()?)),
        }
    }
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}
