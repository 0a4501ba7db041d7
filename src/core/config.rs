//! Configuration management for the gateway.
//!
//! This module provides a centralized configuration structure populated from
//! a `.env` file, environment variables, or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Addresses of the backing services.
    pub backends: BackendsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Base addresses of the book API and Ollama.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendsConfig {
    /// Book catalog API, e.g. `https://localhost:7294/api`.
    pub books_base_url: String,

    /// Ollama API, e.g. `http://localhost:11434`.
    pub ollama_base_url: String,
}

pub const DEFAULT_BOOKS_BASE_URL: &str = "https://localhost:7294/api/";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            books_base_url: normalize_base_url(DEFAULT_BOOKS_BASE_URL),
            ollama_base_url: normalize_base_url(DEFAULT_OLLAMA_BASE_URL),
        }
    }
}

impl BackendsConfig {
    /// Read `API_BASE_ADDRESS` and `OLLAMA_BASE_URL`, falling back to defaults.
    pub fn from_env() -> Self {
        let read = |name: &str, default: &str| {
            let value = std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string());
            normalize_base_url(&value)
        };

        Self {
            books_base_url: read("API_BASE_ADDRESS", DEFAULT_BOOKS_BASE_URL),
            ollama_base_url: read("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "livros-mcp-gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            backends: BackendsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `.env` and environment variables.
    ///
    /// Server settings are prefixed with `MCP_` (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_HTTP_PORT`, ...). Backend addresses keep the names
    /// the backing services are deployed with: `API_BASE_ADDRESS` and
    /// `OLLAMA_BASE_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.backends = BackendsConfig::from_env();

        config
    }
}

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
