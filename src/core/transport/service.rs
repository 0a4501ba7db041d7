//! Transport service - orchestrates the enabled transports.
//!
//! The HTTP socket is bound before anything else starts, so a taken port
//! fails startup. The listener then runs as an independent task and the stdio
//! channel runs in the foreground. When the channel closes (the MCP client
//! went away), the HTTP listener keeps serving until it stops on its own.

use tracing::{error, info};

use super::{TransportConfig, TransportError, TransportResult};
use crate::core::{McpServer, Result};

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Transport service - manages the transport layer for the gateway.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Log information about the configured transports.
    pub fn log_info(&self) {
        info!("Starting transports: {}", self.config.description());
    }

    /// Check the configuration against the transports compiled in.
    pub fn validate(&self) -> TransportResult<()> {
        if !self.config.is_enabled() {
            return Err(TransportError::config(
                "no transport enabled; set MCP_STDIO or MCP_HTTP_ENABLED",
            ));
        }
        #[cfg(not(feature = "stdio"))]
        if self.config.stdio {
            return Err(TransportError::config(
                "stdio transport requested but the `stdio` feature is disabled",
            ));
        }
        #[cfg(not(feature = "http"))]
        if self.config.http.is_some() {
            return Err(TransportError::config(
                "HTTP transport requested but the `http` feature is disabled",
            ));
        }
        Ok(())
    }

    /// Start every enabled transport with the given MCP server.
    ///
    /// This method blocks until all transports are shut down.
    pub async fn run(self, server: McpServer) -> Result<()> {
        self.validate()?;
        self.log_info();

        #[cfg(feature = "http")]
        let http_task = match self.config.http.clone() {
            Some(cfg) => {
                let transport = HttpTransport::new(cfg);
                let listener = transport.bind().await?;
                let server = server.clone();
                Some(tokio::spawn(async move {
                    let result = transport.serve(listener, server).await;
                    if let Err(e) = &result {
                        error!("HTTP transport failed: {}", e);
                    }
                    result
                }))
            }
            None => None,
        };
        #[cfg(not(feature = "http"))]
        let http_task: Option<tokio::task::JoinHandle<TransportResult<()>>> = None;

        #[cfg(feature = "stdio")]
        if self.config.stdio {
            let result = StdioTransport::run(server).await;
            if http_task.is_none() {
                return Ok(result?);
            }
            match result {
                Ok(()) => info!("STDIO channel closed, HTTP keeps serving"),
                Err(e) => error!("STDIO transport failed, HTTP keeps serving: {}", e),
            }
        }

        if let Some(task) = http_task {
            task.await
                .map_err(|e| TransportError::http(format!("HTTP task aborted: {}", e)))??;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_enabled_is_rejected() {
        let service = TransportService::new(TransportConfig {
            stdio: false,
            http: None,
        });
        assert!(matches!(service.validate(), Err(TransportError::ConfigError(_))));
    }

    #[cfg(all(feature = "stdio", feature = "http"))]
    #[test]
    fn test_default_config_is_valid() {
        let service = TransportService::new(TransportConfig::default());
        assert!(service.validate().is_ok());
    }

    #[cfg(all(feature = "stdio", feature = "http"))]
    #[tokio::test]
    async fn test_taken_http_port_fails_startup() {
        use crate::core::{Config, Error};
        use crate::domains::backends::{BackendClients, BooksClient, OllamaClient};

        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let http = reqwest::Client::new();
        let server = McpServer::with_clients(
            Config::default(),
            BackendClients::new(
                BooksClient::new(http.clone(), "http://127.0.0.1:1"),
                OllamaClient::new(http, "http://127.0.0.1:1"),
            ),
        );
        let mut config = TransportConfig::http(port, "127.0.0.1");
        config.stdio = true;
        let service = TransportService::new(config);

        // Returns before the stdio channel is opened.
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), service.run(server))
            .await
            .expect("startup should not block on stdio");

        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::BindError { .. }))
        ));
    }
}
