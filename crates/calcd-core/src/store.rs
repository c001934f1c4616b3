//! # Result Store
//!
//! Concurrency-safe map from `ExpressionId` to `ExpressionRecord`.
//!
//! The store owns both the map and the lock guarding it. A single mutex is
//! held for the duration of one operation and never across evaluation.
//! Every read hands out clones, so a returned snapshot is never affected by
//! later inserts.
//!
//! There is no deletion: records live until the store is dropped.

use crate::{CalcError, ExpressionId, ExpressionRecord};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory, process-lifetime record store.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Mutex<HashMap<ExpressionId, ExpressionRecord>>,
}

impl ResultStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the map.
    ///
    /// No operation panics while holding the guard, so a poisoned lock still
    /// protects a consistent map and is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, HashMap<ExpressionId, ExpressionRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new record under its id.
    ///
    /// Fails with `CalcError::DuplicateId` if the id is already stored; an
    /// existing record is never overwritten.
    pub fn insert(&self, record: ExpressionRecord) -> Result<(), CalcError> {
        let mut records = self.lock();
        if records.contains_key(&record.id) {
            return Err(CalcError::DuplicateId(record.id));
        }
        records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Snapshot of all stored records, in no particular order.
    #[must_use]
    pub fn list(&self) -> Vec<ExpressionRecord> {
        self.lock().values().cloned().collect()
    }

    /// Look up a record by id. `None` is the normal not-found outcome.
    #[must_use]
    pub fn get(&self, id: &ExpressionId) -> Option<ExpressionRecord> {
        self.lock().get(id).cloned()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
