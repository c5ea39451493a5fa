use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sidetree_crypto::calculate_unique_suffix;
use sidetree_types::{Operation, OperationType, Payload, Request};
use tracing::debug;

use crate::batch::OperationSubmitter;
use crate::error::{CoreError, CoreResult};
use crate::processor::{with_id, Processor};
use crate::protocol::ProtocolClient;
use crate::validator::DocumentValidator;

/// Create/update and resolve entry points for one namespace.
#[async_trait]
pub trait DocumentHandler: Send + Sync {
    /// Namespace prefix of every identifier this handler issues.
    fn namespace(&self) -> &str;

    /// Accept an enveloped operation. A create returns the new document;
    /// updates and deletes return `None` once queued.
    async fn update(&self, request: Request) -> CoreResult<Option<Value>>;

    /// Resolve a fully qualified identifier to its current document.
    async fn resolve(&self, id: &str) -> CoreResult<Value>;
}

/// Document handler wired from the node's capabilities.
pub struct DidDocumentHandler {
    namespace: String,
    protocol: Arc<dyn ProtocolClient>,
    validator: Arc<dyn DocumentValidator>,
    writer: Arc<dyn OperationSubmitter>,
    processor: Processor,
}

impl DidDocumentHandler {
    pub fn new(
        namespace: impl Into<String>,
        protocol: Arc<dyn ProtocolClient>,
        validator: Arc<dyn DocumentValidator>,
        writer: Arc<dyn OperationSubmitter>,
        processor: Processor,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            protocol,
            validator,
            writer,
            processor,
        }
    }

    fn qualify(&self, unique_suffix: &str) -> String {
        format!("{}:{}", self.namespace, unique_suffix)
    }

    fn decode_document(&self, payload: &Payload) -> CoreResult<Value> {
        let document = payload
            .decode_document()
            .map_err(|e| CoreError::InvalidRequest(format!("invalid didDocument: {e}")))?
            .ok_or_else(|| {
                CoreError::InvalidRequest(format!("{} requires a didDocument", payload.operation))
            })?;
        self.validator.is_valid_original_document(&document)?;
        Ok(document)
    }

    fn target_suffix(payload: &Payload) -> CoreResult<String> {
        match payload.did_unique_suffix.as_deref() {
            Some(suffix) if !suffix.is_empty() => Ok(suffix.to_owned()),
            _ => Err(CoreError::InvalidRequest(format!(
                "{} requires a didUniqueSuffix",
                payload.operation
            ))),
        }
    }

    fn build_operation(&self, request: &Request) -> CoreResult<Operation> {
        let parameters = self.protocol.current();
        if request.payload.len() > parameters.max_operation_size {
            return Err(CoreError::InvalidRequest(format!(
                "operation size {} exceeds the maximum of {}",
                request.payload.len(),
                parameters.max_operation_size
            )));
        }

        let payload = request
            .decode_payload()
            .map_err(|e| CoreError::InvalidRequest(format!("invalid payload: {e}")))?;

        let (unique_suffix, document) = match payload.operation {
            OperationType::Create => {
                let document = self.decode_document(&payload)?;
                let suffix = calculate_unique_suffix(&request.payload, parameters.hash_algorithm);
                (suffix.into_string(), Some(document))
            }
            OperationType::Update => {
                let document = self.decode_document(&payload)?;
                (Self::target_suffix(&payload)?, Some(document))
            }
            OperationType::Delete => (Self::target_suffix(&payload)?, None),
        };

        let operation = Operation {
            operation: payload.operation,
            id: self.qualify(&unique_suffix),
            unique_suffix,
            document,
            encoded_payload: request.payload.clone(),
            transaction_number: 0,
            operation_index: 0,
        };
        self.validator.is_valid_operation(&operation)?;
        Ok(operation)
    }
}

#[async_trait]
impl DocumentHandler for DidDocumentHandler {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn update(&self, request: Request) -> CoreResult<Option<Value>> {
        let operation = self.build_operation(&request)?;
        let kind = operation.operation;
        let id = operation.id.clone();
        let created = match kind {
            OperationType::Create => operation.document.clone().map(|doc| with_id(doc, &id)),
            _ => None,
        };
        self.writer.submit(operation)?;
        debug!(id = %id, operation = %kind, "operation accepted");
        Ok(created)
    }

    async fn resolve(&self, id: &str) -> CoreResult<Value> {
        let suffix = id
            .strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| {
                CoreError::InvalidRequest(format!("{id} is not in namespace {}", self.namespace))
            })?;
        if suffix.is_empty() {
            return Err(CoreError::InvalidRequest(format!("{id} has no unique suffix")));
        }
        self.processor.resolve(id)
    }
}

impl std::fmt::Debug for DidDocumentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DidDocumentHandler")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}
