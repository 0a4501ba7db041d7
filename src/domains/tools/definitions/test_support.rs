//! Helpers shared by tool tests.

use serde_json::{Map, Value};

use super::ToolDefinition;
use crate::domains::backends::{BackendClients, BooksClient, OllamaClient};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::params::ToolArguments;

/// An address nothing listens on.
pub const OFFLINE: &str = "http://127.0.0.1:1";

pub fn clients(books_url: &str, ollama_url: &str) -> BackendClients {
    let http = reqwest::Client::new();
    BackendClients::new(
        BooksClient::new(http.clone(), books_url),
        OllamaClient::new(http, ollama_url),
    )
}

/// Decode `params` against `T`'s declarations and run it.
pub async fn run<T: ToolDefinition>(clients: BackendClients, params: Value) -> ToolResult<String> {
    let raw: Map<String, Value> = params.as_object().cloned().unwrap_or_default();
    let args = ToolArguments::decode(&T::parameters(), &raw)?;
    T::execute(clients, args).await
}
