//! Test server harness.

use rerank::gateway::{HandlerState, create_router_with_state};
use rerank::model::{Reranker, RerankerConfig};
use rerank::scoring::Scorer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub const TEST_MODEL_NAME: &str = "test/bge-reranker";

#[derive(Clone)]
pub struct TestServerConfig {
    pub model_name: String,
    /// `None` uses the stub [`Reranker`].
    pub scorer: Option<Arc<dyn Scorer>>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            model_name: TEST_MODEL_NAME.to_string(),
            scorer: None,
        }
    }
}

impl TestServerConfig {
    pub fn with_scorer(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            scorer: Some(scorer),
            ..Self::default()
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server on an ephemeral port with the given scorer.
///
/// Without an explicit scorer the lexical [`Reranker::stub`] is used, so no
/// model files are needed.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let scorer = match config.scorer {
        Some(scorer) => scorer,
        None => Arc::new(Reranker::stub()),
    };

    serve(HandlerState::new(scorer, config.model_name)).await
}

/// Spawns a server backed by the model in `RERANK_MODEL_PATH`.
///
/// Returns `None` when the variable is unset so real-model tests can skip.
pub async fn spawn_real_server() -> Option<Result<TestServer, ServerStartupError>> {
    let model_path = std::env::var("RERANK_MODEL_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())?;
    let model_name =
        std::env::var("RERANK_MODEL_NAME").unwrap_or_else(|_| TEST_MODEL_NAME.to_string());

    let reranker = match Reranker::load(RerankerConfig::new(model_path)) {
        Ok(reranker) => reranker,
        Err(e) => return Some(Err(ServerStartupError::StartupFailed(e.to_string()))),
    };

    Some(serve(HandlerState::new(Arc::new(reranker), model_name)).await)
}

async fn serve(state: HandlerState) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
