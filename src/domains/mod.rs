//! Domains module containing business logic organized by bounded contexts.
//!
//! - `backends` - HTTP clients for the book API and Ollama
//! - `tools` - the tool catalog, parameter coercion and the dispatcher
//! - `schema` - renderings of the catalog for each transport

pub mod backends;
pub mod schema;
pub mod tools;
