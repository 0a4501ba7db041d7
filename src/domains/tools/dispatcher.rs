//! Tool dispatcher.
//!
//! The single boundary where an invocation (tool name + untyped parameter bag)
//! becomes a text result. Unknown tools, missing parameters, backend failures
//! and even handler panics all come back as plain text; nothing escapes as an
//! error value.

use futures::FutureExt;
use serde_json::{Map, Value};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::catalog::ToolCatalog;
use super::error::ToolError;
use super::params::ToolArguments;
use crate::domains::backends::BackendClients;

/// Resolves tool invocations against a catalog and shared backend clients.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    catalog: Arc<ToolCatalog>,
    clients: BackendClients,
}

impl Dispatcher {
    pub fn new(catalog: Arc<ToolCatalog>, clients: BackendClients) -> Self {
        Self { catalog, clients }
    }

    pub fn catalog(&self) -> &Arc<ToolCatalog> {
        &self.catalog
    }

    pub fn clients(&self) -> &BackendClients {
        &self.clients
    }

    /// Execute a tool and return its text result or a user-facing error message.
    #[instrument(skip(self, params), fields(tool = %name))]
    pub async fn execute(&self, name: &str, params: &Map<String, Value>) -> String {
        let Some(descriptor) = self.catalog.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return failure_message("", &ToolError::not_found(name));
        };

        let args = match ToolArguments::decode(descriptor.parameters(), params) {
            Ok(args) => args,
            Err(e) => {
                warn!("Rejected invocation of {}: {}", descriptor.name(), e);
                return failure_message(descriptor.failure(), &e);
            }
        };

        info!("Executing tool {}", descriptor.name());
        let invocation = descriptor.invoke(self.clients.clone(), args);

        match AssertUnwindSafe(invocation).catch_unwind().await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Tool {} failed: {}", descriptor.name(), e);
                failure_message(descriptor.failure(), &e)
            }
            Err(_) => {
                error!("Tool {} panicked", descriptor.name());
                failure_message(descriptor.failure(), &ToolError::internal("handler panicked"))
            }
        }
    }
}

/// Render a tool error as the text returned to callers.
pub fn failure_message(failure: &str, err: &ToolError) -> String {
    match err {
        ToolError::NotFound(name) => format!("Ferramenta '{}' não encontrada", name),
        ToolError::MissingParameter(name) => format!("Parâmetro '{}' é obrigatório", name),
        other => format!("{}: {}", failure, other),
    }
}
