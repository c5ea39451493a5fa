use std::net::SocketAddr;
use std::sync::Mutex;

use sidetree_types::{ComponentState, Lifecycle};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::route::RouteRegistration;
use crate::router::build_router;

struct Serving {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    join: JoinHandle<std::io::Result<()>>,
}

/// Document service listener with a checked start/stop lifecycle.
///
/// `start` returns once the socket is bound; serving continues on a spawned
/// task until `stop` signals a graceful shutdown and waits for it.
pub struct HttpServer {
    config: ServerConfig,
    routes: Vec<RouteRegistration>,
    lifecycle: Lifecycle,
    serving: Mutex<Option<Serving>>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, routes: Vec<RouteRegistration>) -> Self {
        Self {
            config,
            routes,
            lifecycle: Lifecycle::new("http listener"),
            serving: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn routes(&self) -> &[RouteRegistration] {
        &self.routes
    }

    pub fn state(&self) -> ComponentState {
        self.lifecycle.state()
    }

    /// Bound address while serving.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.serving
            .lock()
            .expect("listener lock poisoned")
            .as_ref()
            .map(|s| s.local_addr)
    }

    /// Bind and start serving. A second call fails with [`ServerError::Listener`].
    pub async fn start(&self) -> ServerResult<SocketAddr> {
        self.lifecycle.claim_start()?;
        match self.bind_and_serve().await {
            Ok(addr) => Ok(addr),
            Err(e) => {
                self.lifecycle.fail();
                Err(e)
            }
        }
    }

    async fn bind_and_serve(&self) -> ServerResult<SocketAddr> {
        let app = build_router(&self.routes)?;
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let join = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });
        *self.serving.lock().expect("listener lock poisoned") = Some(Serving {
            local_addr,
            shutdown,
            join,
        });
        info!(address = %local_addr, routes = self.routes.len(), "document service listening");
        Ok(local_addr)
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    /// A second call fails with [`ServerError::Listener`].
    pub async fn stop(&self) -> ServerResult<()> {
        self.lifecycle.claim_stop()?;
        let serving = self.serving.lock().expect("listener lock poisoned").take();
        let Some(serving) = serving else {
            return Ok(());
        };
        if serving.shutdown.send(()).is_err() {
            warn!(address = %serving.local_addr, "listener task exited before shutdown");
        }
        match serving.join.await {
            Ok(Ok(())) => {
                info!(address = %serving.local_addr, "document service stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(ServerError::Io(e)),
            Err(e) => Err(ServerError::Internal(format!("listener task failed: {e}"))),
        }
    }
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("config", &self.config)
            .field("routes", &self.routes)
            .field("state", &self.state())
            .finish()
    }
}
