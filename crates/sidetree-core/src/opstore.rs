use std::collections::HashMap;
use std::sync::RwLock;

use sidetree_types::Operation;

use crate::error::{CoreError, CoreResult};

/// Authoritative store of processed (anchored) operations, keyed by the
/// fully qualified document identifier.
pub trait OperationStore: Send + Sync {
    /// All operations for `id` in insertion order. `CoreError::NotFound` if
    /// there are none.
    fn get(&self, id: &str) -> CoreResult<Vec<Operation>>;

    fn put(&self, operations: Vec<Operation>) -> CoreResult<()>;
}

#[derive(Default)]
pub struct InMemoryOperationStore {
    operations: RwLock<HashMap<String, Vec<Operation>>>,
}

impl InMemoryOperationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct documents with at least one operation.
    pub fn document_count(&self) -> usize {
        self.operations.read().expect("operation store lock poisoned").len()
    }
}

impl OperationStore for InMemoryOperationStore {
    fn get(&self, id: &str) -> CoreResult<Vec<Operation>> {
        self.operations
            .read()
            .expect("operation store lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("no operations for {id}")))
    }

    fn put(&self, operations: Vec<Operation>) -> CoreResult<()> {
        let mut map = self.operations.write().expect("operation store lock poisoned");
        for op in operations {
            map.entry(op.id.clone()).or_default().push(op);
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryOperationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryOperationStore")
            .field("documents", &self.document_count())
            .finish()
    }
}
