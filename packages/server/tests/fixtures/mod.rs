//! Test server fixture.
//!
//! Each test gets its own server on an ephemeral port, with the SQLite file
//! and the upload directory inside a temporary directory.

#![allow(dead_code)]

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use chatroom_server::{Config, serve};
use tempfile::TempDir;
use tokio::{net::TcpListener, sync::oneshot};

pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start a server after letting the test adjust the config
    pub async fn start_with(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = Config::default();
        config.server.address = "127.0.0.1:0".to_string();
        config.server.upload_dir = dir.path().join("uploads");
        config.database.path = dir.path().join("chatroom.db");
        configure(&mut config);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = serve(listener, config, shutdown).await {
                panic!("test server failed: {e}");
            }
        });

        let server = Self {
            addr,
            shutdown: Some(shutdown_tx),
            dir,
        };
        server.wait_for_connections(0).await;
        server
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Live connection count reported by `/api/health`
    pub async fn connections(&self) -> u64 {
        let body: serde_json::Value = reqwest::get(format!("{}/api/health", self.base_url()))
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        body["connections"].as_u64().expect("connections should be a number")
    }

    /// Poll `/api/health` until exactly `expected` clients are registered
    pub async fn wait_for_connections(&self, expected: u64) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.connections().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("server never reached {expected} connections"));
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
