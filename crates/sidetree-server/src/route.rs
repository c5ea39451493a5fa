use std::sync::Arc;

use axum::http::Method;
use sidetree_core::DocumentHandler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    /// Accepts a request envelope and forwards it to [`DocumentHandler::update`].
    Update,
    /// Takes the identifier from the last path segment and forwards it to
    /// [`DocumentHandler::resolve`].
    Resolve,
}

/// One route bound to a document handler.
///
/// Method and path are plain data; the handler is held, not specialized, so
/// the same handler type serves any number of namespaces and paths.
#[derive(Clone)]
pub struct RouteRegistration {
    pub method: Method,
    pub path: String,
    pub handler: Arc<dyn DocumentHandler>,
    pub kind: RouteKind,
}

impl RouteRegistration {
    /// `POST base_path`.
    pub fn update(base_path: impl Into<String>, handler: Arc<dyn DocumentHandler>) -> Self {
        Self {
            method: Method::POST,
            path: base_path.into(),
            handler,
            kind: RouteKind::Update,
        }
    }

    /// `GET base_path/:id`.
    pub fn resolve(base_path: impl AsRef<str>, handler: Arc<dyn DocumentHandler>) -> Self {
        Self {
            method: Method::GET,
            path: format!("{}/:id", base_path.as_ref().trim_end_matches('/')),
            handler,
            kind: RouteKind::Resolve,
        }
    }

    /// Update and resolve routes for one handler under one base path.
    pub fn pair(base_path: &str, handler: Arc<dyn DocumentHandler>) -> [Self; 2] {
        [
            Self::update(base_path, Arc::clone(&handler)),
            Self::resolve(base_path, handler),
        ]
    }
}

impl std::fmt::Debug for RouteRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistration")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("namespace", &self.handler.namespace())
            .field("kind", &self.kind)
            .finish()
    }
}
