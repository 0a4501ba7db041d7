//! Schema domain module.
//!
//! Renders the tool catalog for the consumers of each transport:
//!
//! - `tool_list` - flat discovery list served at `/api/tools`
//! - `openapi` - OpenAPI 3.0 document for the HTTP routes
//! - `mcp` - per-tool JSON Schema published over the stdio transport
//!
//! Every renderer is a pure function of the catalog; calling one twice on the
//! same catalog yields byte-identical output.

mod mcp;
pub mod openapi;
pub mod tool_list;

pub use mcp::input_schema;
pub use openapi::openapi_document;
pub use tool_list::{ParameterListing, ToolListing, tool_list};
