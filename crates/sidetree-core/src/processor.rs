use std::sync::Arc;

use serde_json::Value;
use sidetree_types::OperationType;

use crate::error::{CoreError, CoreResult};
use crate::opstore::OperationStore;

/// Read model over the operation store.
///
/// Operations for a document are applied in `(transaction, index)` order:
/// the first create sets the document, later creates are ignored, an update
/// replaces the document, and a delete deactivates it for good.
pub struct Processor {
    store: Arc<dyn OperationStore>,
}

impl Processor {
    pub fn new(store: Arc<dyn OperationStore>) -> Self {
        Self { store }
    }

    /// Current document for a fully qualified `id`, with its `id` field set.
    pub fn resolve(&self, id: &str) -> CoreResult<Value> {
        let mut operations = self.store.get(id)?;
        operations.sort_by_key(|op| (op.transaction_number, op.operation_index));

        let mut document: Option<Value> = None;
        for op in operations {
            match op.operation {
                OperationType::Create if document.is_none() => document = op.document,
                OperationType::Create => {}
                OperationType::Update if document.is_some() => document = op.document,
                OperationType::Update => {}
                OperationType::Delete if document.is_some() => {
                    return Err(CoreError::NotFound(format!("{id} has been deleted")));
                }
                OperationType::Delete => {}
            }
        }

        document
            .map(|doc| with_id(doc, id))
            .ok_or_else(|| CoreError::NotFound(format!("no document for {id}")))
    }
}

/// Set `id` on a JSON object document. Non-objects are returned unchanged.
pub(crate) fn with_id(mut document: Value, id: &str) -> Value {
    if let Value::Object(map) = &mut document {
        map.insert("id".into(), Value::String(id.to_owned()));
    }
    document
}
