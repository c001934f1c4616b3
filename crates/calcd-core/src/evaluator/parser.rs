//! Recursive-descent parser.
//!
//! Grammar:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := unary (('*' | '/') unary)*
//! unary      := '-' unary | primary
//! primary    := NUMBER | '(' expression ')'
//! ```

use super::EvalError;
use super::ast::{BinaryOp, Expr};
use super::lexer::{Token, TokenKind};
use crate::primitives::MAX_NESTING_DEPTH;

/// Parse a token stream into an expression tree.
///
/// The whole input must form exactly one expression.
pub fn parse(tokens: &[Token]) -> Result<Expr, EvalError> {
    if tokens.is_empty() {
        return Err(EvalError::EmptyExpression);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expression()?;

    match parser.peek() {
        None => Ok(expr),
        Some(Token {
            kind: TokenKind::RParen,
            offset,
        }) => Err(EvalError::UnmatchedParenthesis { offset }),
        Some(token) => Err(unexpected(token)),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(EvalError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expression(&mut self) -> Result<Expr, EvalError> {
        self.chain(Self::term, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        self.chain(Self::unary, |kind| match kind {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            _ => None,
        })
    }

    /// Parse `operand (op operand)*` for one precedence level.
    fn chain(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr, EvalError>,
        operator: fn(TokenKind) -> Option<BinaryOp>,
    ) -> Result<Expr, EvalError> {
        let first = operand(self)?;
        let mut rest = Vec::new();

        while let Some(op) = self.peek().and_then(|t| operator(t.kind)) {
            self.pos += 1;
            rest.push((op, operand(self)?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Chain {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        if matches!(self.peek(), Some(t) if t.kind == TokenKind::Minus) {
            self.pos += 1;
            self.enter()?;
            let operand = self.unary()?;
            self.leave();
            return Ok(Expr::Negate(Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let token = self.next().ok_or(EvalError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(v) => Ok(Expr::Number(v)),
            TokenKind::LParen => {
                if self.peek().is_none() {
                    return Err(EvalError::UnclosedParenthesis {
                        offset: token.offset,
                    });
                }
                self.enter()?;
                let inner = self.expression()?;
                self.leave();
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(unexpected(other)),
                    None => Err(EvalError::UnclosedParenthesis {
                        offset: token.offset,
                    }),
                }
            }
            _ => Err(unexpected(token)),
        }
    }
}

fn unexpected(token: Token) -> EvalError {
    EvalError::UnexpectedToken {
        found: token.kind.to_string(),
        offset: token.offset,
    }
}
