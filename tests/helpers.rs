// Shared test helpers for gateway setup and test site creation.
//
// This module provides common utilities used across multiple test files to
// reduce duplication.

use std::net::SocketAddr;
use std::path::Path;

use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use esi_gateway::{Config, Gateway, GatewayReport, LogLevel};

/// Creates a temporary document root populated with the given files.
/// Paths are relative to the root; parent directories are created as needed.
#[allow(dead_code)] // Used by other test files
pub fn create_test_site(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    for (path, contents) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full, contents).expect("Failed to write test file");
    }
    dir
}

/// A gateway serving a test site on an ephemeral port.
#[allow(dead_code)] // Used by other test files
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: CancellationToken,
    pub handle: JoinHandle<anyhow::Result<GatewayReport>>,
}

#[allow(dead_code)] // Used by other test files
impl TestGateway {
    /// Binds a gateway over `root` on port 0 and starts serving.
    pub async fn spawn(root: &Path) -> Self {
        let config = Config {
            root: root.to_path_buf(),
            port: 0,
            log_level: LogLevel::Error, // Reduce log noise in tests
            ..Default::default()
        };
        let gateway = Gateway::bind(config)
            .await
            .expect("Failed to bind test gateway");
        let addr = gateway.local_addr();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(gateway.serve(shutdown.clone()));
        TestGateway {
            addr,
            shutdown,
            handle,
        }
    }

    /// URL of a path on the running gateway.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stops the gateway and returns its run report.
    pub async fn stop(self) -> GatewayReport {
        self.shutdown.cancel();
        self.handle
            .await
            .expect("Gateway task panicked")
            .expect("Gateway returned an error")
    }
}
