//! Backend connectivity probing.
//!
//! Shared by the `VerificarConectividade` tool and the HTTP status endpoint.
//! Probing never fails: each backend reports either [`CONNECTED`] or an
//! `Erro: <cause>` string.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::books::BooksClient;
use super::error::BackendResult;
use super::ollama::OllamaClient;

/// Status text for a reachable backend.
pub const CONNECTED: &str = "Conectado com sucesso";

/// A backend that can be checked for reachability.
#[async_trait]
pub trait BackendProbe: Send + Sync {
    /// Key under which the probe result is reported.
    fn label(&self) -> &'static str;

    /// Perform a cheap read-only call against the backend.
    async fn probe(&self) -> BackendResult<()>;
}

#[async_trait]
impl BackendProbe for BooksClient {
    fn label(&self) -> &'static str {
        "API_Livros"
    }

    async fn probe(&self) -> BackendResult<()> {
        self.list_books(None).await.map(|_| ())
    }
}

#[async_trait]
impl BackendProbe for OllamaClient {
    fn label(&self) -> &'static str {
        "Ollama"
    }

    async fn probe(&self) -> BackendResult<()> {
        self.models().await.map(|_| ())
    }
}

/// Probe every backend concurrently and collect a label → status map.
pub async fn check_connectivity(probes: &[&dyn BackendProbe]) -> BTreeMap<String, String> {
    let results = join_all(probes.iter().map(|probe| async move {
        let status = match probe.probe().await {
            Ok(()) => {
                debug!("{} reachable", probe.label());
                CONNECTED.to_string()
            }
            Err(e) => {
                warn!("{} unreachable: {}", probe.label(), e);
                format!("Erro: {}", e)
            }
        };
        (probe.label().to_string(), status)
    }))
    .await;

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::backends::BackendError;

    struct FakeProbe {
        label: &'static str,
        healthy: bool,
    }

    #[async_trait]
    impl BackendProbe for FakeProbe {
        fn label(&self) -> &'static str {
            self.label
        }

        async fn probe(&self) -> BackendResult<()> {
            if self.healthy {
                Ok(())
            } else {
                Err(BackendError::decode("fake", "boom"))
            }
        }
    }

    #[tokio::test]
    async fn test_check_connectivity_reports_each_backend() {
        let up = FakeProbe { label: "Up", healthy: true };
        let down = FakeProbe { label: "Down", healthy: false };

        let status = check_connectivity(&[&up, &down]).await;
        assert_eq!(status.len(), 2);
        assert_eq!(status["Up"], CONNECTED);
        assert!(status["Down"].starts_with("Erro: "));
        assert!(status["Down"].contains("boom"));
    }
}
