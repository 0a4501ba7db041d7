//! Tools domain module.
//!
//! This module handles all tool-related functionality for the gateway.
//! Tools are named operations that MCP and HTTP clients invoke with an untyped
//! parameter bag; each one calls the book API, Ollama, or both.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, one file per group
//! - `params.rs` - Parameter declarations and coercion
//! - `catalog.rs` - Name → descriptor registry shared by every transport
//! - `dispatcher.rs` - The invocation boundary (errors become text)
//! - `router.rs` - ToolRouter builder for the stdio transport
//! - `registry.rs` - The list of shipped tools
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Implement `ToolDefinition` in the matching `definitions/` file
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `registry.rs`
//!
//! **No need to modify the router or the HTTP transport!** Both read the catalog.

pub mod catalog;
pub mod definitions;
pub mod dispatcher;
mod error;
pub mod params;
mod registry;
pub mod router;

pub use catalog::{ToolCatalog, ToolDescriptor};
pub use dispatcher::Dispatcher;
pub use error::{ToolError, ToolResult};
pub use params::{ParamType, ParamValue, ParameterSpec, ToolArguments};
pub use registry::get_all_tools;
pub use router::build_tool_router;
