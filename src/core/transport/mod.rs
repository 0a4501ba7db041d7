//! Transport layer for the gateway.
//!
//! This module provides the transport implementations:
//! - **STDIO**: Standard input/output (MCP protocol) - feature: `stdio`
//! - **HTTP**: REST endpoints, tool execution and OpenAPI - feature: `http`
//!
//! Both can run at once. They share one `McpServer`, hence one dispatcher,
//! one tool catalog and one set of backend clients.
//!
//! # Feature Flags
//!
//! Transport implementations are conditionally compiled based on features:
//! - `stdio`: STDIO transport - minimal dependencies
//! - `http`: HTTP transport - adds axum, tower, tower-http
//!
//! Both are enabled by default.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::{HttpConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
