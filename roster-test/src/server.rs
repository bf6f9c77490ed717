//! In-process test server

use roster::config::ServerConfig;
use roster_teachers::{EphemeralStore, TeacherStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// How long `start` waits for the health endpoint to answer
pub const STARTUP_TIMEOUT_SECS: u64 = 5;

/// A running Roster server bound to a random local port
pub struct TestServer {
    handle: JoinHandle<()>,
    base_url: String,
    base_path: String,
}

impl TestServer {
    /// Start a server over a fresh in-memory store
    pub async fn start() -> Result<Self, TestError> {
        Self::start_with_store(Arc::new(EphemeralStore::new())).await
    }

    /// Start a server over the given store
    pub async fn start_with_store(store: Arc<dyn TeacherStore>) -> Result<Self, TestError> {
        Self::start_with(ServerConfig::default(), store).await
    }

    /// Start a server with a custom server section (host and port are ignored)
    pub async fn start_with(
        config: ServerConfig,
        store: Arc<dyn TeacherStore>,
    ) -> Result<Self, TestError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| TestError::BindFailed(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| TestError::BindFailed(e.to_string()))?;

        let app = roster::create_router(&config, store);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Test server exited");
            }
        });

        let server = Self {
            handle,
            base_url: format!("http://{addr}"),
            base_path: config.base_path,
        };
        server.wait_ready().await?;

        info!(url = %server.base_url, "Roster test server ready");
        Ok(server)
    }

    async fn wait_ready(&self) -> Result<(), TestError> {
        let health = format!("{}/health", self.base_url);
        let start = std::time::Instant::now();

        while start.elapsed() < Duration::from_secs(STARTUP_TIMEOUT_SECS) {
            if let Ok(response) = reqwest::get(&health).await {
                if response.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Err(TestError::StartupTimeout)
    }

    /// Get the base URL
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// URL of the teacher collection
    pub fn teachers_url(&self) -> String {
        format!("{}{}", self.base_url, self.base_path)
    }

    /// Get a client for the teacher endpoints
    pub fn client(&self) -> crate::RosterClient {
        crate::RosterClient::new(self.teachers_url())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Errors that can occur with test server
#[derive(Debug)]
pub enum TestError {
    BindFailed(String),
    StartupTimeout,
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::BindFailed(msg) => write!(f, "Failed to bind test server: {msg}"),
            TestError::StartupTimeout => write!(f, "Server startup timed out"),
        }
    }
}

impl std::error::Error for TestError {}
