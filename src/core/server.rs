//! MCP Server implementation and lifecycle management.
//!
//! The server owns the pieces every transport shares: the configuration, the
//! backend clients, the tool catalog and the dispatcher over them. The stdio
//! transport serves it through rmcp; the HTTP transport reads the same
//! dispatcher and catalog, so both expose identical tools.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` and registered in
//! `domains/tools/registry.rs`. The ToolRouter is built from the catalog in
//! `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use super::error;
use crate::domains::backends::BackendClients;
use crate::domains::tools::{Dispatcher, ToolCatalog, build_tool_router};

const INSTRUCTIONS: &str = "Gateway MCP para a API de Livros e o Ollama. \
    Use as ferramentas para consultar e cadastrar livros, gerar texto com modelos \
    do Ollama ou combinar as duas fontes.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher shared with the HTTP transport.
    dispatcher: Arc<Dispatcher>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails only if the shared HTTP client cannot be built.
    pub fn new(config: Config) -> error::Result<Self> {
        let clients = BackendClients::from_config(&config.backends)?;
        Ok(Self::with_clients(config, clients))
    }

    /// Create a server over already-built backend clients.
    pub fn with_clients(config: Config, clients: BackendClients) -> Self {
        let clients =
            clients.with_identity(config.server.name.clone(), config.server.version.clone());
        let catalog = Arc::new(ToolCatalog::standard());
        let dispatcher = Arc::new(Dispatcher::new(catalog, clients));
        info!("Serving {} tools", dispatcher.catalog().len());

        Self {
            tool_router: build_tool_router::<Self>(dispatcher.clone()),
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn catalog(&self) -> &Arc<ToolCatalog> {
        self.dispatcher.catalog()
    }

    pub fn clients(&self) -> &BackendClients {
        self.dispatcher.clients()
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::backends::{BooksClient, OllamaClient};

    fn server() -> McpServer {
        let http = reqwest::Client::new();
        McpServer::with_clients(
            Config::default(),
            BackendClients::new(
                BooksClient::new(http.clone(), "http://127.0.0.1:1"),
                OllamaClient::new(http, "http://127.0.0.1:1"),
            ),
        )
    }

    #[test]
    fn test_server_info() {
        let server = server();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "livros-mcp-gateway");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_router_and_dispatcher_share_catalog() {
        let server = server();
        assert_eq!(server.tool_router.list_all().len(), server.catalog().len());
    }

    #[test]
    fn test_clients_carry_configured_identity() {
        let mut config = Config::default();
        config.server.name = "biblioteca".into();
        let server = McpServer::with_clients(config, server().clients().clone());
        assert_eq!(server.clients().identity.name, "biblioteca");
        assert_eq!(server.get_info().server_info.name, "biblioteca");
    }

    #[test]
    fn test_new_uses_configured_addresses() {
        let mut config = Config::default();
        config.backends.books_base_url = "http://books.local/api".into();
        let server = McpServer::new(config).unwrap();
        assert_eq!(server.clients().books.base_url(), "http://books.local/api");
    }
}
