//! Tool definitions module.
//!
//! Each group of tools lives in its own file. A tool is a unit struct
//! implementing [`ToolDefinition`]; `registry.rs` turns every definition into a
//! catalog entry.
//!
//! ## Adding a New Tool
//!
//! 1. Implement `ToolDefinition` in the file of its group
//! 2. Export it here
//! 3. Register it in `registry.rs`

pub mod assistant;
pub mod books;
pub mod ollama;
pub mod system;

#[cfg(test)]
pub(crate) mod test_support;

pub use assistant::{ConsultarLivrosComIaTool, RealizarTarefaCompletaTool};
pub use books::{AtualizarLivroTool, CadastrarLivroTool, ObterLivrosTool, ObterPorAutorTool};
pub use ollama::{
    AnalisarImagemTool, BaixarModeloTool, GenerateResponseTool, GerarEmbeddingsTool,
    GerarTextoAvancadoTool, ListModelsTool,
};
pub use system::{ExibirConfiguracaoTool, VerificarConectividadeTool};

use super::catalog::ToolFuture;
use super::params::{ParameterSpec, ToolArguments};
use crate::domains::backends::BackendClients;

/// Trait for tool definitions.
///
/// Each tool provides its metadata and an `execute` function. Handlers return
/// errors with `?`; the dispatcher turns them into `<FAILURE>: <cause>` text.
pub trait ToolDefinition {
    /// The unique name of the tool.
    const NAME: &'static str;

    /// A description of what the tool does.
    const DESCRIPTION: &'static str;

    /// Prefix of the message returned when the tool fails.
    const FAILURE: &'static str;

    /// The parameters this tool accepts.
    fn parameters() -> Vec<ParameterSpec>;

    /// Run the tool.
    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture;
}
