use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use sidetree_core::{CoreError, DocumentHandler};
use sidetree_store::StoreError;
use sidetree_types::Request;
use tracing::{debug, warn};

/// Handler state shared by the routes of one registration.
pub type SharedHandler = Arc<dyn DocumentHandler>;

/// A [`CoreError`] rendered as an HTTP response with its display text as body.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CoreError::InvalidRequest(_) | CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) | CoreError::Store(StoreError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        (status, self.0.to_string()).into_response()
    }
}

/// Liveness check.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Create, update or delete a document from a request envelope.
///
/// A create answers with the new document; other operations answer with an
/// empty `200`.
pub async fn update_handler(
    State(handler): State<SharedHandler>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: Request = serde_json::from_slice(&body)
        .map_err(|e| CoreError::InvalidRequest(format!("malformed request body: {e}")))?;
    match handler.update(request).await? {
        Some(document) => Ok(Json(document).into_response()),
        None => Ok(StatusCode::OK.into_response()),
    }
}

/// Resolve the identifier in the last path segment.
pub async fn resolve_handler(
    State(handler): State<SharedHandler>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(handler.resolve(&id).await?))
}
