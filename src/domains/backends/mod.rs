//! Backends domain module.
//!
//! Typed HTTP clients for the two services the gateway fronts:
//!
//! - `books` - the book catalog CRUD API
//! - `ollama` - the Ollama LLM inference API
//! - `probe` - connectivity checks shared by tools and the HTTP status endpoint
//!
//! Both clients share one `reqwest::Client` connection pool and hold no
//! per-request state, so a single instance of each serves every concurrent
//! invocation for the lifetime of the process.

pub mod books;
mod error;
pub mod ollama;
pub mod probe;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

pub use books::{BookRecord, BookRequest, BooksClient, UNKNOWN_BOOK_ID};
pub use error::{BackendError, BackendResult};
pub use ollama::{GenerationOptions, ModelSummary, OllamaClient};
pub use probe::{BackendProbe, CONNECTED, check_connectivity};

use crate::core::config::BackendsConfig;

/// Name and version the gateway reports about itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Shared handles to every backend client.
#[derive(Debug, Clone)]
pub struct BackendClients {
    pub books: Arc<BooksClient>,
    pub ollama: Arc<OllamaClient>,

    /// Identity shown by the introspection tools.
    pub identity: Arc<ServerIdentity>,
}

impl BackendClients {
    /// Build both clients over a single connection pool.
    pub fn from_config(config: &BackendsConfig) -> BackendResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::unavailable("HTTP client", e))?;

        info!(
            "Backends: books at {}, Ollama at {}",
            config.books_base_url, config.ollama_base_url
        );

        Ok(Self::new(
            BooksClient::new(http.clone(), &config.books_base_url),
            OllamaClient::new(http, &config.ollama_base_url),
        ))
    }

    pub fn new(books: BooksClient, ollama: OllamaClient) -> Self {
        Self {
            books: Arc::new(books),
            ollama: Arc::new(ollama),
            identity: Arc::new(ServerIdentity::default()),
        }
    }

    /// Replace the reported server identity.
    pub fn with_identity(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.identity = Arc::new(ServerIdentity {
            name: name.into(),
            version: version.into(),
        });
        self
    }

    /// Probe both backends; never fails.
    pub async fn check_connectivity(&self) -> BTreeMap<String, String> {
        let probes: [&dyn BackendProbe; 2] = [self.books.as_ref(), self.ollama.as_ref()];
        check_connectivity(&probes).await
    }
}
