//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub instagram: InstagramConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
    /// Origin allowed to call the API cross-site (e.g., a hosted web UI).
    /// When unset, any origin is allowed.
    #[serde(default)]
    pub allowed_origin: Option<String>,
}

/// Instagram Graph API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramConfig {
    /// Base URL of the Graph API, overridable for tests
    pub graph_base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
    /// How many pages of account media to walk while resolving a post URL
    pub max_media_pages: u32,
    /// How many pages of top-level comments to fetch per post
    pub max_comment_pages: u32,
}

/// Request size limits
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted request body size (CSV uploads dominate)
    pub max_body_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format ("pretty" or "json")
    pub format: String,
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// # Priority (lowest to highest)
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (SORTEO__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("instagram.graph_base_url", "https://graph.facebook.com/v18.0")?
            .set_default("instagram.request_timeout_seconds", 30)?
            .set_default("instagram.max_media_pages", 5)?
            .set_default("instagram.max_comment_pages", 50)?
            .set_default("limits.max_body_bytes", 2 * 1024 * 1024)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (SORTEO__*)
            .add_source(
                Environment::with_prefix("SORTEO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Sanity-check values the `config` crate cannot express
    fn validate(&self) -> Result<(), crate::error::AppError> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(crate::error::AppError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        if self.instagram.max_media_pages == 0 || self.instagram.max_comment_pages == 0 {
            return Err(crate::error::AppError::Config(
                "instagram page limits must be at least 1".to_string(),
            ));
        }
        if self.limits.max_body_bytes == 0 {
            return Err(crate::error::AppError::Config(
                "limits.max_body_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                allowed_origin: None,
            },
            instagram: InstagramConfig {
                graph_base_url: "https://graph.facebook.com/v18.0".to_string(),
                request_timeout_seconds: 30,
                max_media_pages: 5,
                max_comment_pages: 50,
            },
            limits: LimitsConfig {
                max_body_bytes: 1024,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = base_config();
        config.logging.format = "yaml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_page_limit_rejected() {
        let mut config = base_config();
        config.instagram.max_media_pages = 0;
        assert!(config.validate().is_err());
    }
}
