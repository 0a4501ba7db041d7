//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Which transports to run. Both may run at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Serve MCP over standard input/output.
    pub stdio: bool,

    /// Serve the HTTP API; `None` disables it.
    pub http: Option<HttpConfig>,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Allow every origin, method and header.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_cors() -> bool {
    true
}

const DEFAULT_HTTP_PORT: u16 = 5500;

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_host(),
            enable_cors: default_cors(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            stdio: true,
            http: Some(HttpConfig::default()),
        }
    }
}

/// Parse a boolean switch; anything but `false`/`0` counts as enabled.
fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0"
        })
        .unwrap_or(default)
}

impl TransportConfig {
    /// Only the stdio transport.
    pub fn stdio() -> Self {
        Self {
            stdio: true,
            http: None,
        }
    }

    /// Only the HTTP transport.
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self {
            stdio: false,
            http: Some(HttpConfig {
                port,
                host: host.into(),
                ..Default::default()
            }),
        }
    }

    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let stdio = env_flag("MCP_STDIO", true);

        let http = env_flag("MCP_HTTP_ENABLED", true).then(|| {
            let port = std::env::var("MCP_HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_HTTP_PORT);
            let host = std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host());
            let enable_cors = env_flag("MCP_HTTP_CORS", true);
            HttpConfig {
                port,
                host,
                enable_cors,
            }
        });

        Self { stdio, http }
    }

    /// Whether at least one transport is enabled.
    pub fn is_enabled(&self) -> bool {
        self.stdio || self.http.is_some()
    }

    /// Get a description of the enabled transports for logging.
    pub fn description(&self) -> String {
        let mut parts = Vec::new();
        if self.stdio {
            parts.push("STDIO (standard MCP mode)".to_string());
        }
        if let Some(cfg) = &self.http {
            parts.push(format!("HTTP on {}:{}", cfg.host, cfg.port));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" + ")
        }
    }
}
