//! # Request Coordinator
//!
//! Orchestrates a submission through validator → evaluator → store, and
//! answers read-only queries against the store.
//!
//! Nothing is stored for a failed submission: the record is inserted only
//! after evaluation has fully succeeded, and the store's lock is taken only
//! for that insert.

use crate::primitives::{MAX_EXPRESSION_LENGTH, MAX_ID_ATTEMPTS};
use crate::store::ResultStore;
use crate::{CalcError, ExpressionId, ExpressionRecord, evaluator, validator};

// =============================================================================
// ID GENERATION
// =============================================================================

/// Source of fresh record identifiers.
///
/// Implementations must be `Send + Sync`: one generator serves every
/// concurrent submission.
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier.
    fn next_id(&self) -> ExpressionId;
}

/// Random v4 UUID identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> ExpressionId {
        ExpressionId::generate()
    }
}

// =============================================================================
// EVALUATION
// =============================================================================

/// Length check, character gate and evaluation, in that order.
///
/// This is everything a submission does before storing; it never touches a
/// store.
pub fn check_and_evaluate(text: &str) -> Result<f64, CalcError> {
    if text.len() > MAX_EXPRESSION_LENGTH {
        return Err(CalcError::ExpressionTooLong {
            length: text.len(),
            max: MAX_EXPRESSION_LENGTH,
        });
    }
    if !validator::validate(text) {
        return Err(CalcError::InvalidExpression);
    }
    Ok(evaluator::evaluate(text)?)
}

// =============================================================================
// QUERY OUTCOME
// =============================================================================

/// Result of a read-only query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// No id was given: every stored record.
    All(Vec<ExpressionRecord>),
    /// The record stored under the requested id.
    Found(ExpressionRecord),
    /// No record has the requested id.
    NotFound,
}

// =============================================================================
// COORDINATOR
// =============================================================================

/// Entry point of the core for the boundary layer.
pub struct Coordinator {
    store: ResultStore,
    ids: Box<dyn IdGenerator>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Create a coordinator with an empty store and UUID identifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(UuidGenerator)
    }

    /// Create a coordinator with a custom identifier source.
    #[must_use]
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            store: ResultStore::new(),
            ids: Box::new(ids),
        }
    }

    /// Validate, evaluate and store an expression.
    ///
    /// Returns the id of the new `completed` record. An id collision is
    /// retried with a fresh id up to `MAX_ID_ATTEMPTS` times before failing
    /// with `CalcError::DuplicateId`.
    pub fn submit(&self, text: &str) -> Result<ExpressionId, CalcError> {
        let result = check_and_evaluate(text)?;

        let mut attempts = 0;
        loop {
            let id = self.ids.next_id();
            attempts += 1;
            match self
                .store
                .insert(ExpressionRecord::completed(id.clone(), result))
            {
                Ok(()) => return Ok(id),
                Err(CalcError::DuplicateId(_)) if attempts < MAX_ID_ATTEMPTS => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// Answer a query: everything when `id` is `None`, otherwise one record.
    #[must_use]
    pub fn query(&self, id: Option<&ExpressionId>) -> QueryOutcome {
        match id {
            None => QueryOutcome::All(self.store.list()),
            Some(id) => self
                .store
                .get(id)
                .map_or(QueryOutcome::NotFound, QueryOutcome::Found),
        }
    }

    /// Snapshot of all stored records.
    #[must_use]
    pub fn list(&self) -> Vec<ExpressionRecord> {
        self.store.list()
    }

    /// Look up one record.
    #[must_use]
    pub fn get(&self, id: &ExpressionId) -> Option<ExpressionRecord> {
        self.store.get(id)
    }

    /// Read access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &ResultStore {
        &self.store
    }
}

// =============================================================================
// TESTS
// =============================================================================
