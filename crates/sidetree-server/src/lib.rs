//! HTTP document service for the Sidetree node.
//!
//! Routes are plain [`RouteRegistration`] data holding a shared
//! [`DocumentHandler`](sidetree_core::DocumentHandler); any number of
//! namespaces can be registered on one [`HttpServer`].

pub mod config;
pub mod error;
pub mod handler;
pub mod route;
pub mod router;
pub mod server;

#[cfg(test)]
mod testing;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::ApiError;
pub use route::{RouteKind, RouteRegistration};
pub use router::build_router;
pub use server::HttpServer;
