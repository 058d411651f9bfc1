// Calculation history store - append-only, insertion-ordered

use crate::core::errors::AbacusError;
use crate::core::models::CalculationRecord;
use std::sync::{Mutex, PoisonError};

/// Trait for history store operations
///
/// `append` is invoked only by the calculation pipeline on success.
/// `list` returns every record in insertion order, without pagination
/// or filtering.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: CalculationRecord) -> Result<(), AbacusError>;
    async fn list(&self) -> Result<Vec<CalculationRecord>, AbacusError>;
}

/// In-memory history store
///
/// Owns its sequence behind a mutex so concurrent appends and snapshots
/// are serialized. One instance lives for the whole process; contents are
/// lost on restart.
pub struct InMemoryHistoryStore {
    records: Mutex<Vec<CalculationRecord>>,
}

impl InMemoryHistoryStore {
    /// Create an empty history store
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Number of records currently stored
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock still holds a structurally intact Vec (push cannot
    // leave it half-updated), so recover rather than propagate the panic.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CalculationRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, record: CalculationRecord) -> Result<(), AbacusError> {
        self.lock().push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CalculationRecord>, AbacusError> {
        Ok(self.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Operation;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_append_then_list_preserves_order() {
        let store = InMemoryHistoryStore::new();

        store
            .append(CalculationRecord::new(Operation::Addition, 5.0))
            .await
            .unwrap();
        store
            .append(CalculationRecord::new(Operation::Division, 2.5))
            .await
            .unwrap();
        store
            .append(CalculationRecord::new(Operation::SquareRoot, 3.0))
            .await
            .unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].operation, Operation::Addition);
        assert_eq!(records[1].operation, Operation::Division);
        assert_eq!(records[2].operation, Operation::SquareRoot);
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = InMemoryHistoryStore::new();
        assert!(store.is_empty());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_all_land() {
        let store = Arc::new(InMemoryHistoryStore::new());
        let mut handles = Vec::new();

        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(CalculationRecord::new(Operation::Multiplication, i as f64))
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 50);
    }

    #[tokio::test]
    async fn test_list_returns_snapshot() {
        let store = InMemoryHistoryStore::new();
        store
            .append(CalculationRecord::new(Operation::Addition, 1.0))
            .await
            .unwrap();

        let snapshot = store.list().await.unwrap();
        store
            .append(CalculationRecord::new(Operation::Addition, 2.0))
            .await
            .unwrap();

        // The earlier snapshot is unaffected by later appends
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }
}
