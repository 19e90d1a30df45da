//! Test server harness for E2E testing.
//!
//! Provides `TestSignalingServer` for spawning real signaling-service
//! instances in tests.

use signaling_service::config::Config;
use signaling_service::live_class::{InMemoryLiveClassDirectory, LiveClassSummary};
use signaling_service::routes::{self, AppState};
use signaling_store::SignalingStore;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared secret the harness configures and the token builder signs with.
pub const TEST_JWT_SECRET: &str = "test-signaling-secret";

/// Test harness for spawning the signaling service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health_flow_e2e() -> anyhow::Result<()> {
///     let server = TestSignalingServer::spawn().await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .get(format!("{}/health", server.url()))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestSignalingServer {
    addr: SocketAddr,
    store: Arc<SignalingStore>,
    directory: Arc<InMemoryLiveClassDirectory>,
    _handle: JoinHandle<()>,
}

impl TestSignalingServer {
    /// Spawn a new test server instance with an empty store and directory.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    ///
    /// The eviction sweeper is not started; tests drive eviction directly
    /// through [`Self::store`].
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        // Build configuration for test environment
        let vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            (
                "SIGNALING_JWT_SECRET".to_string(),
                TEST_JWT_SECRET.to_string(),
            ),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let store = Arc::new(SignalingStore::new());
        let directory = Arc::new(InMemoryLiveClassDirectory::new());

        let state = Arc::new(AppState {
            store: Arc::clone(&store),
            directory: directory.clone(),
            config,
        });

        // Build routes using the service's real route builder
        let app = routes::build_routes(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            store,
            directory,
            _handle: handle,
        })
    }

    /// Base URL of the running server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Handle to the signaling store backing the server.
    pub fn store(&self) -> &Arc<SignalingStore> {
        &self.store
    }

    /// Handle to the in-memory live-class directory backing the server.
    pub fn directory(&self) -> &Arc<InMemoryLiveClassDirectory> {
        &self.directory
    }

    /// Register a live class in the directory.
    pub fn seed_class(&self, summary: LiveClassSummary) {
        self.directory.insert_class(summary);
    }

    /// Register the default fixture class ([`crate::fixtures::default_class`]).
    pub fn seed_default_class(&self) {
        self.seed_class(crate::fixtures::default_class());
    }
}
