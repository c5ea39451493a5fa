use std::sync::Arc;

use serde_json::Value;
use sidetree_types::{Operation, OperationType};

use crate::error::{CoreError, CoreResult};
use crate::opstore::OperationStore;

/// Namespace-specific rules applied before an operation is queued.
pub trait DocumentValidator: Send + Sync {
    /// Check a document supplied by a create or update.
    fn is_valid_original_document(&self, document: &Value) -> CoreResult<()>;

    /// Check an operation against the current operation store.
    fn is_valid_operation(&self, operation: &Operation) -> CoreResult<()>;
}

/// Rules for DID documents.
///
/// A document must be a JSON object with a non-empty `publicKey` array and
/// must not carry its own `id`. Creates must not target an anchored
/// document; updates and deletes must.
pub struct DidValidator {
    store: Arc<dyn OperationStore>,
}

impl DidValidator {
    pub fn new(store: Arc<dyn OperationStore>) -> Self {
        Self { store }
    }

    fn exists(&self, id: &str) -> CoreResult<bool> {
        match self.store.get(id) {
            Ok(ops) => Ok(!ops.is_empty()),
            Err(CoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl DocumentValidator for DidValidator {
    fn is_valid_original_document(&self, document: &Value) -> CoreResult<()> {
        let Value::Object(map) = document else {
            return Err(CoreError::Validation("document must be a JSON object".into()));
        };
        if map.contains_key("id") {
            return Err(CoreError::Validation(
                "document must not contain an id; it is derived from the payload".into(),
            ));
        }
        match map.get("publicKey") {
            Some(Value::Array(keys)) if !keys.is_empty() => Ok(()),
            _ => Err(CoreError::Validation(
                "document must contain at least one public key".into(),
            )),
        }
    }

    fn is_valid_operation(&self, operation: &Operation) -> CoreResult<()> {
        let exists = self.exists(&operation.id)?;
        match operation.operation {
            OperationType::Create if exists => Err(CoreError::Validation(format!(
                "document {} already exists",
                operation.id
            ))),
            OperationType::Update | OperationType::Delete if !exists => Err(
                CoreError::Validation(format!("document {} does not exist", operation.id)),
            ),
            _ => Ok(()),
        }
    }
}
