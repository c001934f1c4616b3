//! # calcd-core
//!
//! The arithmetic engine for calcd - THE LOGIC.
//!
//! This crate validates, evaluates and stores arithmetic expressions:
//!
//! ```text
//! submit:  Coordinator --> validator --> evaluator --> ResultStore::insert
//! query:   Coordinator --> ResultStore::{list, get}
//! ```
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Evaluation is deterministic and never panics on any input
//! - The result store owns its map and lock; callers only see copies
//! - A failed submission never leaves a record behind

// =============================================================================
// MODULES
// =============================================================================

pub mod coordinator;
pub mod evaluator;
pub mod primitives;
pub mod store;
pub mod types;
pub mod validator;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use coordinator::{
    Coordinator, IdGenerator, QueryOutcome, UuidGenerator, check_and_evaluate,
};
pub use evaluator::{EvalError, evaluate};
pub use store::ResultStore;
pub use types::{CalcError, ExpressionId, ExpressionRecord, ExpressionStatus};
pub use validator::validate;
