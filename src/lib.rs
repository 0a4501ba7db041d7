//! Livros MCP Gateway Library
//!
//! This crate exposes a book catalog API and an Ollama LLM backend as one
//! catalog of MCP tools, served over stdio and over HTTP.
//!
//! # Architecture
//!
//! The gateway is organized into the following modules:
//!
//! - **core**: Configuration, error handling, the MCP server and the transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **backends**: HTTP clients for the book API and Ollama
//!   - **tools**: The tool catalog, parameter coercion and the dispatcher
//!   - **schema**: Tool list and OpenAPI renderings of the catalog
//!
//! # Example
//!
//! ```rust,no_run
//! use livros_mcp_gateway::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
