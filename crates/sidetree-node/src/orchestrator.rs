use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use sidetree_core::{
    BatchWriter, BatchWriterConfig, CoreError, DidDocumentHandler, DidValidator,
    DocumentHandler, Observer, ObserverConfig, Processor,
};
use sidetree_server::{HttpServer, RouteRegistration};
use sidetree_store::SledEngine;
use tracing::{error, info};

use crate::config::NodeConfig;
use crate::context::build_context;
use crate::error::{NodeError, NodeResult};

/// Namespace of the documents served by the node.
pub const DID_NAMESPACE: &str = "did:sidetree";

/// Base path of the update and resolve routes.
pub const DOCUMENT_PATH: &str = "/document";

pub type StopError = Box<dyn std::error::Error + Send + Sync>;

/// A component stopped during shutdown.
#[async_trait]
pub trait Stoppable: Send + Sync {
    fn name(&self) -> &'static str;
    async fn stop(&self) -> Result<(), StopError>;
}

#[derive(Debug)]
pub struct ShutdownFailure {
    pub component: &'static str,
    pub error: StopError,
}

/// Outcome of a shutdown: every step ran, these ones failed.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    pub failures: Vec<ShutdownFailure>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self, component: &str) -> bool {
        self.failures.iter().any(|f| f.component == component)
    }
}

/// Stop each step once, in order. A failure is logged and recorded and
/// never skips the steps after it.
pub async fn run_shutdown(steps: &[&dyn Stoppable]) -> ShutdownReport {
    let mut report = ShutdownReport::default();
    for step in steps {
        let component = step.name();
        match step.stop().await {
            Ok(()) => info!(component, "stopped"),
            Err(error) => {
                error!(component, error = %error, "shutdown step failed");
                report.failures.push(ShutdownFailure { component, error });
            }
        }
    }
    report
}

#[async_trait]
impl Stoppable for BatchWriter {
    fn name(&self) -> &'static str {
        "batch writer"
    }

    async fn stop(&self) -> Result<(), StopError> {
        Ok(BatchWriter::stop(self).await?)
    }
}

#[async_trait]
impl Stoppable for Observer {
    fn name(&self) -> &'static str {
        "observer"
    }

    async fn stop(&self) -> Result<(), StopError> {
        Ok(Observer::stop(self).await?)
    }
}

#[async_trait]
impl Stoppable for SledEngine {
    fn name(&self) -> &'static str {
        "storage"
    }

    async fn stop(&self) -> Result<(), StopError> {
        Ok(self.close()?)
    }
}

#[async_trait]
impl Stoppable for HttpServer {
    fn name(&self) -> &'static str {
        "http listener"
    }

    async fn stop(&self) -> Result<(), StopError> {
        Ok(HttpServer::stop(self).await?)
    }
}

fn startup(component: &'static str) -> impl Fn(CoreError) -> NodeError {
    move |source| NodeError::Startup { component, source }
}

/// A running node: storage, both workers and the document service.
pub struct Node {
    storage: Arc<SledEngine>,
    batch_writer: Arc<BatchWriter>,
    observer: Observer,
    server: HttpServer,
}

impl Node {
    /// Start every component in order, aborting at the first failure.
    ///
    /// Components already started when a later one fails are not stopped;
    /// dropping them ends their tasks.
    pub async fn start(config: NodeConfig) -> NodeResult<Self> {
        let storage = Arc::new(SledEngine::open(&config.db_path)?);
        let context = build_context(&config, Arc::clone(&storage))?;

        let batch_writer = Arc::new(
            BatchWriter::new(
                DID_NAMESPACE,
                &context,
                BatchWriterConfig {
                    interval: config.batch_interval,
                },
            )
            .map_err(startup("batch writer"))?,
        );
        batch_writer.start().map_err(startup("batch writer"))?;

        let observer = Observer::new(
            context.blockchain(),
            context.cas(),
            context.operation_store(),
            ObserverConfig {
                interval: config.observer_interval,
            },
        )
        .map_err(startup("observer"))?;
        observer.start().map_err(startup("observer"))?;

        let handler: Arc<dyn DocumentHandler> = Arc::new(DidDocumentHandler::new(
            DID_NAMESPACE,
            context.protocol(),
            Arc::new(DidValidator::new(context.operation_store())),
            batch_writer.clone(),
            Processor::new(context.operation_store()),
        ));
        let server = HttpServer::new(
            config.server_config(),
            RouteRegistration::pair(DOCUMENT_PATH, handler).to_vec(),
        );
        let addr = server.start().await?;
        info!(address = %addr, namespace = DID_NAMESPACE, "node started");

        Ok(Self {
            storage,
            batch_writer,
            observer,
            server,
        })
    }

    pub fn storage(&self) -> &Arc<SledEngine> {
        &self.storage
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.local_addr()
    }

    /// Shutdown order: batch writer, observer, storage, listener.
    fn shutdown_steps(&self) -> [&dyn Stoppable; 4] {
        [
            &*self.batch_writer,
            &self.observer,
            &*self.storage,
            &self.server,
        ]
    }

    pub async fn shutdown(self) -> ShutdownReport {
        info!("shutting down");
        let report = run_shutdown(&self.shutdown_steps()).await;
        if report.is_clean() {
            info!("shutdown complete");
        } else {
            error!(failures = report.failures.len(), "shutdown completed with failures");
        }
        report
    }

    /// Serve until `signal` resolves, then shut down.
    pub async fn run_until<F>(self, signal: F) -> ShutdownReport
    where
        F: Future<Output = ()>,
    {
        signal.await;
        self.shutdown().await
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("storage", &self.storage)
            .field("batch_writer", &self.batch_writer)
            .field("observer", &self.observer)
            .field("server", &self.server)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidetree_types::{ComponentState, Payload, Request};
    use std::sync::Mutex;
    use std::time::Duration;

    // ---- Recording fakes ----

    type Journal = Arc<Mutex<Vec<&'static str>>>;

    struct Recorder {
        name: &'static str,
        fail: bool,
        journal: Journal,
    }

    #[async_trait]
    impl Stoppable for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn stop(&self) -> Result<(), StopError> {
            self.journal.lock().unwrap().push(self.name);
            if self.fail {
                return Err(format!("{} refused to stop", self.name).into());
            }
            Ok(())
        }
    }

    fn recorder(name: &'static str, fail: bool, journal: &Journal) -> Recorder {
        Recorder {
            name,
            fail,
            journal: Arc::clone(journal),
        }
    }

    #[tokio::test]
    async fn steps_run_in_order() {
        let journal = Journal::default();
        let writer = recorder("batch writer", false, &journal);
        let storage = recorder("storage", false, &journal);
        let listener = recorder("http listener", false, &journal);

        let report = run_shutdown(&[&writer, &storage, &listener]).await;
        assert!(report.is_clean());
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["batch writer", "storage", "http listener"]
        );
    }

    #[tokio::test]
    async fn storage_failure_does_not_skip_listener() {
        let journal = Journal::default();
        let writer = recorder("batch writer", false, &journal);
        let storage = recorder("storage", true, &journal);
        let listener = recorder("http listener", false, &journal);

        let report = run_shutdown(&[&writer, &storage, &listener]).await;
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["batch writer", "storage", "http listener"]
        );
        assert_eq!(report.failures.len(), 1);
        assert!(report.failed("storage"));
        assert!(!report.failed("http listener"));
    }

    #[tokio::test]
    async fn every_failure_is_recorded() {
        let journal = Journal::default();
        let steps = [
            recorder("a", true, &journal),
            recorder("b", true, &journal),
            recorder("c", true, &journal),
        ];
        let refs: Vec<&dyn Stoppable> = steps.iter().map(|s| s as &dyn Stoppable).collect();
        let report = run_shutdown(&refs).await;
        assert_eq!(report.failures.len(), 3);
        assert_eq!(journal.lock().unwrap().len(), 3);
    }

    // ---- Node ----

    fn test_config(dir: &tempfile::TempDir) -> NodeConfig {
        let mut config = NodeConfig::new(0, dir.path().join("db"));
        config.host = "127.0.0.1".into();
        config.batch_interval = Duration::from_millis(20);
        config.observer_interval = Duration::from_millis(20);
        config
    }

    fn create_request() -> Request {
        Request {
            protected: None,
            payload: Payload::create(r##"{"publicKey":[{"id":"#key-1"}]}"##)
                .encode()
                .unwrap(),
            signature: String::new(),
        }
    }

    #[tokio::test]
    async fn node_shutdown_order() {
        let dir = tempfile::tempdir().unwrap();
        let node = Node::start(test_config(&dir)).await.unwrap();
        let names: Vec<_> = node.shutdown_steps().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["batch writer", "observer", "storage", "http listener"]);
        assert!(node.shutdown().await.is_clean());
    }

    #[tokio::test]
    async fn node_serves_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let node = Node::start(test_config(&dir)).await.unwrap();
        let addr = node.local_addr().unwrap();
        let storage = Arc::clone(node.storage());

        let request = create_request();
        let created: serde_json::Value = reqwest::Client::new()
            .post(format!("http://{addr}{DOCUMENT_PATH}"))
            .json(&request)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let expected = sidetree_crypto::calculate_id(
            DID_NAMESPACE,
            &request.payload,
            sidetree_types::HashAlgorithm::Sha2_256,
        );
        assert_eq!(created["id"], expected.as_str());

        let mut resolved = None;
        for _ in 0..20 {
            let response = reqwest::get(format!("http://{addr}{DOCUMENT_PATH}/{expected}"))
                .await
                .unwrap();
            if response.status() == 200 {
                resolved = Some(response.json::<serde_json::Value>().await.unwrap());
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(resolved.expect("resolves once anchored")["id"], expected.as_str());

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let running = tokio::spawn(node.run_until(async {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();
        let report = running.await.unwrap();

        assert!(report.is_clean(), "{report:?}");
        assert_eq!(storage.state(), ComponentState::Stopped);
        assert!(reqwest::get(format!("http://{addr}/healthz")).await.is_err());
    }

    #[tokio::test]
    async fn failed_storage_close_still_stops_listener() {
        let dir = tempfile::tempdir().unwrap();
        let node = Node::start(test_config(&dir)).await.unwrap();
        let addr = node.local_addr().unwrap();
        // Closing early makes the shutdown's close fail.
        node.storage().close().unwrap();

        let report = node.shutdown().await;
        assert_eq!(report.failures.len(), 1);
        assert!(report.failed("storage"));
        assert!(reqwest::get(format!("http://{addr}/healthz")).await.is_err());
    }

    #[tokio::test]
    async fn unusable_dbpath_aborts_startup() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        let mut config = test_config(&dir);
        config.db_path = file;
        assert!(matches!(Node::start(config).await, Err(NodeError::Storage(_))));
    }

    #[tokio::test]
    async fn invalid_protocol_parameters_abort_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.max_batch_operations = 0;
        assert!(matches!(
            Node::start(config).await,
            Err(NodeError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn occupied_port_aborts_startup() {
        let dir = tempfile::tempdir().unwrap();
        let first = Node::start(test_config(&dir)).await.unwrap();
        let port = first.local_addr().unwrap().port();

        let other = tempfile::tempdir().unwrap();
        let mut config = test_config(&other);
        config.port = port;
        assert!(matches!(
            Node::start(config).await,
            Err(NodeError::Listener(_))
        ));
        assert!(first.shutdown().await.is_clean());
    }
}
