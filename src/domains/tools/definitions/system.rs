//! Gateway introspection tools.

use futures::FutureExt;
use serde_json::json;

use super::ToolDefinition;
use crate::domains::backends::BackendClients;
use crate::domains::tools::catalog::ToolFuture;
use crate::domains::tools::params::{ParameterSpec, ToolArguments};

// ============================================================================
// VerificarConectividade
// ============================================================================

/// Probe both backends and report per-backend status.
pub struct VerificarConectividadeTool;

impl ToolDefinition for VerificarConectividadeTool {
    const NAME: &'static str = "VerificarConectividade";
    const DESCRIPTION: &'static str =
        "Verifica a conectividade entre os sistemas (MCP Server, Ollama e API de Livros)";
    const FAILURE: &'static str = "Erro ao verificar status";

    fn parameters() -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn execute(clients: BackendClients, _args: ToolArguments) -> ToolFuture {
        async move {
            let status = clients.check_connectivity().await;
            Ok(serde_json::to_string_pretty(&status)?)
        }
        .boxed()
    }
}

// ============================================================================
// ExibirConfiguracao
// ============================================================================

pub struct ExibirConfiguracaoTool;

impl ToolDefinition for ExibirConfiguracaoTool {
    const NAME: &'static str = "ExibirConfiguracao";
    const DESCRIPTION: &'static str = "Exibe configurações de conexão do MCP Server";
    const FAILURE: &'static str = "Erro ao exibir configuração";

    fn parameters() -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn execute(clients: BackendClients, _args: ToolArguments) -> ToolFuture {
        async move {
            let config = json!({
                "McpServer": {
                    "Versao": clients.identity.version,
                    "Nome": clients.identity.name,
                },
                "Conexoes": {
                    "ApiLivros": clients.books.base_url(),
                    "Ollama": clients.ollama.base_url(),
                },
            });
            Ok(serde_json::to_string_pretty(&config)?)
        }
        .boxed()
    }
}
