//! Common test utilities for E2E tests

use sorteo::{config, AppState};
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server with default test configuration
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a new test server from a custom configuration
    pub async fn with_config(config: config::AppConfig) -> Self {
        let state = AppState::new(config).unwrap();
        let app = sorteo::build_router(state);

        // Let the OS assign a port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        Self {
            addr: format!("http://{}", addr),
            client,
        }
    }

    /// Build a full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }
}

/// Default configuration for tests
pub fn test_config() -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origin: None,
        },
        instagram: config::InstagramConfig {
            graph_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_seconds: 5,
            max_media_pages: 5,
            max_comment_pages: 50,
        },
        limits: config::LimitsConfig {
            max_body_bytes: 1024 * 1024,
        },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}
