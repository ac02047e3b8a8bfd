//! Sorteo - random winner selection for social-media giveaways
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Giveaway runs / entry previews                           │
//! │  - CSV import, Instagram comment acquisition                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Giveaway Engine (pure)                    │
//! │  comments -> entries -> eligible entries -> winners         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Ingestion Layer                         │
//! │  - CSV uploads                                              │
//! │  - Instagram Graph API walker (reqwest)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is persisted: entries and winners are recomputed on every
//! submission, and access tokens are only forwarded upstream.
//!
//! # Modules
//!
//! - `api`: HTTP handlers
//! - `giveaway`: entry derivation, winner selection, statistics
//! - `ingest`: CSV and Instagram comment sources
//! - `auth`: bearer access-token extraction
//! - `config`: configuration management
//! - `error`: error types

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod giveaway;
pub mod ingest;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the configuration and HTTP client.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,
    /// Shared HTTP client for the Graph API
    pub http: reqwest::Client,
}

impl AppState {
    /// Initialize application state from configuration
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.instagram.request_timeout_seconds,
            ))
            .build()
            .map_err(error::AppError::HttpClient)?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{
        compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
    };

    let cors_layer = build_cors_layer(&state.config.server);
    let max_body_bytes = state.config.limits.max_body_bytes;

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/api", api::api_router())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{Any, CorsLayer};

    let Some(allowed_origin) = server.allowed_origin.as_deref() else {
        return CorsLayer::permissive();
    };

    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(Any)
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse configured CORS origin; denying cross-origin requests"
            );
            CorsLayer::new().allow_methods(Any).allow_headers(Any)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
