//! Tool Registry - the list of every tool the gateway ships.
//!
//! This is the single source of truth for available tools. The catalog is
//! built from it, and both the channel (stdio) and HTTP transports read the
//! catalog, so a tool registered here is exposed everywhere.

use super::catalog::ToolDescriptor;
use super::definitions::{
    AnalisarImagemTool, AtualizarLivroTool, BaixarModeloTool, CadastrarLivroTool,
    ConsultarLivrosComIaTool, ExibirConfiguracaoTool, GenerateResponseTool, GerarEmbeddingsTool,
    GerarTextoAvancadoTool, ListModelsTool, ObterLivrosTool, ObterPorAutorTool,
    RealizarTarefaCompletaTool, VerificarConectividadeTool,
};

/// Get all tools as catalog descriptors.
pub fn get_all_tools() -> Vec<ToolDescriptor> {
    vec![
        // Books
        ToolDescriptor::from_definition::<ObterLivrosTool>(),
        ToolDescriptor::from_definition::<ObterPorAutorTool>(),
        ToolDescriptor::from_definition::<CadastrarLivroTool>(),
        ToolDescriptor::from_definition::<AtualizarLivroTool>(),
        // Ollama
        ToolDescriptor::from_definition::<ListModelsTool>(),
        ToolDescriptor::from_definition::<GenerateResponseTool>(),
        ToolDescriptor::from_definition::<GerarTextoAvancadoTool>(),
        ToolDescriptor::from_definition::<AnalisarImagemTool>(),
        ToolDescriptor::from_definition::<GerarEmbeddingsTool>(),
        ToolDescriptor::from_definition::<BaixarModeloTool>(),
        // Books + Ollama
        ToolDescriptor::from_definition::<ConsultarLivrosComIaTool>(),
        ToolDescriptor::from_definition::<RealizarTarefaCompletaTool>(),
        // Gateway
        ToolDescriptor::from_definition::<VerificarConectividadeTool>(),
        ToolDescriptor::from_definition::<ExibirConfiguracaoTool>(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_names_are_unique() {
        let tools = get_all_tools();
        let names: HashSet<_> = tools.iter().map(|t| t.name().to_lowercase()).collect();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_every_tool_is_described() {
        for tool in get_all_tools() {
            assert!(!tool.description().is_empty(), "{} has no description", tool.name());
            assert!(tool.failure().starts_with("Erro ao "), "{}", tool.name());
            for param in tool.parameters() {
                assert!(!param.description.is_empty(), "{}.{}", tool.name(), param.name);
            }
        }
    }

    #[test]
    fn test_parameterless_tools() {
        for tool in get_all_tools() {
            let expected_empty = matches!(
                tool.name(),
                "ListModels" | "VerificarConectividade" | "ExibirConfiguracao"
            );
            assert_eq!(tool.parameters().is_empty(), expected_empty, "{}", tool.name());
        }
    }
}
