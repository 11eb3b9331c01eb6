//! Test server harness for E2E testing
//!
//! Provides TestTokenServer for spawning real token service instances in tests.

use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use token_service::config::Config;
use token_service::observability::metrics::{init_metrics_recorder, metrics_builder};
use token_service::routes::{self, AppState};
use tokio::task::JoinHandle;

/// Test harness for spawning the token service in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_issue_e2e() -> Result<(), anyhow::Error> {
///     let server = TestTokenServer::spawn(test_config()?).await?;
///
///     let response = reqwest::get(format!(
///         "{}/api/token?room=team-sync&name=alice",
///         server.url()
///     ))
///     .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestTokenServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestTokenServer {
    /// Spawn a server on a random local port with the given configuration.
    ///
    /// `config.bind_address` is ignored; the server always binds 127.0.0.1:0.
    pub async fn spawn(config: Config) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState::new(config.clone()));
        let app = routes::build_routes(state, metrics_handle()?);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// URL of the token endpoint for `room` and `name`, percent-encoded.
    pub fn token_url(&self, room: &str, name: &str) -> Result<reqwest::Url, anyhow::Error> {
        let mut url = reqwest::Url::parse(&format!("{}/api/token", self.url()))?;
        url.query_pairs_mut()
            .append_pair("room", room)
            .append_pair("name", name);
        Ok(url)
    }
}

/// The global recorder can be installed once per process. Later servers get
/// a standalone recorder so their `/metrics` still renders.
fn metrics_handle() -> Result<PrometheusHandle, anyhow::Error> {
    match init_metrics_recorder() {
        Ok(handle) => Ok(handle),
        Err(_) => {
            let recorder = metrics_builder()
                .map_err(|e| anyhow::anyhow!(e))?
                .build_recorder();
            Ok(recorder.handle())
        }
    }
}

impl Drop for TestTokenServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
