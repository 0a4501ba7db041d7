//! Tool catalog.
//!
//! The catalog maps a tool name to its [`ToolDescriptor`]: description,
//! parameter declarations, failure label and handler. It is built once at
//! startup and shared read-only by the dispatcher and both transports, so the
//! tools each transport exposes cannot diverge.

use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use super::definitions::ToolDefinition;
use super::error::ToolResult;
use super::params::{ParameterSpec, ToolArguments};
use super::registry::get_all_tools;
use crate::domains::backends::BackendClients;

/// Future returned by a tool handler.
pub type ToolFuture = BoxFuture<'static, ToolResult<String>>;

/// Handler bound to a tool: backend handles plus coerced arguments in, text out.
pub type ToolHandler = Arc<dyn Fn(BackendClients, ToolArguments) -> ToolFuture + Send + Sync>;

/// A registered tool.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    failure: &'static str,
    parameters: Vec<ParameterSpec>,
    handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn new<F>(
        name: &'static str,
        description: &'static str,
        failure: &'static str,
        parameters: Vec<ParameterSpec>,
        handler: F,
    ) -> Self
    where
        F: Fn(BackendClients, ToolArguments) -> ToolFuture + Send + Sync + 'static,
    {
        Self {
            name,
            description,
            failure,
            parameters,
            handler: Arc::new(handler),
        }
    }

    /// Build a descriptor from a [`ToolDefinition`].
    pub fn from_definition<T: ToolDefinition + 'static>() -> Self {
        Self::new(
            T::NAME,
            T::DESCRIPTION,
            T::FAILURE,
            T::parameters(),
            T::execute,
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Label prefixed to failure messages, e.g. `Erro ao buscar livros`.
    pub fn failure(&self) -> &'static str {
        self.failure
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Run the handler.
    pub fn invoke(&self, clients: BackendClients, args: ToolArguments) -> ToolFuture {
        (self.handler)(clients, args)
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Registry of tools keyed by lower-cased name.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, Arc<ToolDescriptor>>,
}

impl ToolCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog of every tool the gateway ships.
    pub fn standard() -> Self {
        let catalog = Self::from_descriptors(get_all_tools());
        info!("Tool catalog ready with {} tools", catalog.len());
        catalog
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ToolDescriptor>) -> Self {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.register(descriptor);
        }
        catalog
    }

    /// Register a tool, replacing any tool whose name differs only by case.
    pub fn register(&mut self, descriptor: ToolDescriptor) {
        let key = descriptor.name.to_lowercase();
        if let Some(previous) = self.tools.insert(key, Arc::new(descriptor)) {
            warn!("Tool '{}' registered twice, keeping the last one", previous.name);
        }
    }

    /// Look a tool up by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&Arc<ToolDescriptor>> {
        self.tools.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Tools in a stable order, independent of registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ToolDescriptor>> {
        self.tools.values()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
