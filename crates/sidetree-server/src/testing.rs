//! Canned document handler for router and listener tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use sidetree_core::{CoreError, CoreResult, DocumentHandler};
use sidetree_store::StoreError;
use sidetree_types::Request;

/// Answers from the request text alone:
///
/// - update payload `invalid` is rejected, `update` is accepted with no body,
///   anything else is a create of `namespace:payload`;
/// - resolve of suffix `known` succeeds, `broken` fails in storage, anything
///   else in the namespace is not found.
pub(crate) struct StubHandler {
    namespace: String,
}

impl StubHandler {
    pub(crate) fn shared(namespace: &str) -> Arc<dyn DocumentHandler> {
        Arc::new(Self {
            namespace: namespace.to_owned(),
        })
    }
}

#[async_trait]
impl DocumentHandler for StubHandler {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn update(&self, request: Request) -> CoreResult<Option<Value>> {
        match request.payload.as_str() {
            "invalid" => Err(CoreError::InvalidRequest("stub rejects this payload".into())),
            "update" => Ok(None),
            payload => Ok(Some(json!({ "id": format!("{}:{payload}", self.namespace) }))),
        }
    }

    async fn resolve(&self, id: &str) -> CoreResult<Value> {
        let suffix = id
            .strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| CoreError::InvalidRequest(format!("{id} is not in this namespace")))?;
        match suffix {
            "known" => Ok(json!({ "id": id })),
            "broken" => Err(StoreError::Storage("disk unavailable".into()).into()),
            _ => Err(CoreError::NotFound(id.to_owned())),
        }
    }
}
