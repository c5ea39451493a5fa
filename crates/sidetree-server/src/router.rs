use std::sync::Arc;

use axum::routing::{get, on, MethodFilter};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::{ServerError, ServerResult};
use crate::handler;
use crate::route::{RouteKind, RouteRegistration};

/// Build the axum router: every registration plus `GET /healthz`.
///
/// Each registration carries its own handler as router state, so several
/// namespaces can share one listener without seeing each other's documents.
pub fn build_router(routes: &[RouteRegistration]) -> ServerResult<Router> {
    let mut router = Router::new().route("/healthz", get(handler::health_handler));
    for route in routes {
        let filter = MethodFilter::try_from(route.method.clone()).map_err(|e| {
            ServerError::Internal(format!("unsupported method for {}: {e}", route.path))
        })?;
        let method_router = match route.kind {
            RouteKind::Update => on(filter, handler::update_handler),
            RouteKind::Resolve => on(filter, handler::resolve_handler),
        };
        router = router.merge(
            Router::new()
                .route(&route.path, method_router)
                .with_state(Arc::clone(&route.handler)),
        );
    }
    Ok(router.layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubHandler;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::util::ServiceExt;

    fn app() -> Router {
        let mut routes = Vec::new();
        routes.extend(RouteRegistration::pair("/document", StubHandler::shared("did:sidetree")));
        routes.extend(RouteRegistration::pair("/sample", StubHandler::shared("sample:sidetree")));
        build_router(&routes).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get_uri(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    // ---- Health ----

    #[tokio::test]
    async fn health_endpoint() {
        let response = send(app(), get_uri("/healthz")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("ok"));
    }

    // ---- Update ----

    #[tokio::test]
    async fn create_returns_document() {
        let response = send(app(), post("/document", r#"{"payload":"alpha"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(doc["id"], "did:sidetree:alpha");
    }

    #[tokio::test]
    async fn non_create_returns_empty_ok() {
        let response = send(app(), post("/document", r#"{"payload":"update"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = send(app(), post("/document", "{not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("malformed request body"));
    }

    #[tokio::test]
    async fn handler_rejection_is_bad_request() {
        let response = send(app(), post("/document", r#"{"payload":"invalid"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let response = send(app(), get_uri("/document")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    // ---- Resolve ----

    #[tokio::test]
    async fn resolve_known_document() {
        let response = send(app(), get_uri("/document/did:sidetree:known")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(doc["id"], "did:sidetree:known");
    }

    #[tokio::test]
    async fn resolve_unknown_is_not_found() {
        let response = send(app(), get_uri("/document/did:sidetree:missing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn resolve_storage_failure_is_server_error() {
        let response = send(app(), get_uri("/document/did:sidetree:broken")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("storage engine error"));
    }

    #[tokio::test]
    async fn routes_dispatch_to_their_own_handler() {
        let response = send(app(), get_uri("/sample/sample:sidetree:known")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(app(), get_uri("/sample/did:sidetree:known")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unregistered_path_is_not_found() {
        let response = send(app(), get_uri("/nothing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
