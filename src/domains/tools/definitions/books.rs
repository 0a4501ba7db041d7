//! Book catalog tools.
//!
//! List, search by author, create and update books through the book API.

use futures::FutureExt;
use tracing::info;

use super::ToolDefinition;
use crate::domains::backends::{BackendClients, BookRecord, BookRequest};
use crate::domains::tools::catalog::ToolFuture;
use crate::domains::tools::params::{ParamType, ParameterSpec, ToolArguments};

/// Result text when a lookup finds nothing.
pub const NO_BOOKS_FOUND: &str = "Nenhum livro encontrado";

/// Render a list of books, or [`NO_BOOKS_FOUND`] when empty.
fn render_books(books: &[BookRecord]) -> serde_json::Result<String> {
    if books.is_empty() {
        Ok(NO_BOOKS_FOUND.to_string())
    } else {
        serde_json::to_string(books)
    }
}

fn book_parameter(description: &'static str) -> ParameterSpec {
    ParameterSpec::required("livro", description, ParamType::Object).with_schema_of::<BookRequest>()
}

// ============================================================================
// ObterAsync
// ============================================================================

/// List books, optionally filtered by title.
pub struct ObterLivrosTool;

impl ToolDefinition for ObterLivrosTool {
    const NAME: &'static str = "ObterAsync";
    const DESCRIPTION: &'static str =
        "Buscar os livros da livraria, definindo um filtro opcional por titulo";
    const FAILURE: &'static str = "Erro ao buscar livros";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::optional(
            "titulo",
            "Filtra opcional pelo titulo do livro",
            ParamType::String,
        )]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let books = clients.books.list_books(args.optional_text("titulo")).await?;
            info!("Found {} book(s)", books.len());
            Ok(render_books(&books)?)
        }
        .boxed()
    }
}

// ============================================================================
// ObterPorAutor
// ============================================================================

/// List the books of one author.
pub struct ObterPorAutorTool;

impl ToolDefinition for ObterPorAutorTool {
    const NAME: &'static str = "ObterPorAutor";
    const DESCRIPTION: &'static str = "Buscar os livros da livraria de um autor";
    const FAILURE: &'static str = "Erro ao buscar livros por autor";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required(
            "autor",
            "Nome do autor do livro",
            ParamType::String,
        )]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let books = clients.books.list_books_by_author(args.text("autor")?).await?;
            Ok(render_books(&books)?)
        }
        .boxed()
    }
}

// ============================================================================
// CadastrarAsync
// ============================================================================

/// Create a book.
pub struct CadastrarLivroTool;

impl CadastrarLivroTool {
    pub const REJECTED: &'static str = "Não foi possível cadastrar o livro";
}

impl ToolDefinition for CadastrarLivroTool {
    const NAME: &'static str = "CadastrarAsync";
    const DESCRIPTION: &'static str = "Criar/Cadastrar um livro";
    const FAILURE: &'static str = "Erro ao cadastrar o livro";

    fn parameters() -> Vec<ParameterSpec> {
        vec![book_parameter("Dados para criação do livro")]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let book: BookRequest = args.object("livro")?;
            let Some(id) = clients.books.create_book(&book).await? else {
                return Ok(Self::REJECTED.to_string());
            };

            // `id` may be UNKNOWN_BOOK_ID when the backend did not report one.
            let created = BookRecord {
                id,
                titulo: book.titulo,
                autor: book.autor,
                date: None,
            };
            Ok(serde_json::to_string(&created)?)
        }
        .boxed()
    }
}

// ============================================================================
// AtualizarAsync
// ============================================================================

/// Update a book.
pub struct AtualizarLivroTool;

impl AtualizarLivroTool {
    pub const UPDATED: &'static str = "Livro atualizado com sucesso";
    pub const REJECTED: &'static str = "Não foi possível atualizar o livro";
}

impl ToolDefinition for AtualizarLivroTool {
    const NAME: &'static str = "AtualizarAsync";
    const DESCRIPTION: &'static str = "Atualizar os dados de um livro";
    const FAILURE: &'static str = "Erro ao atualizar o livro";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("id", "Código ou identificador do livro", ParamType::Integer),
            book_parameter("Dados para atualização de um livro"),
        ]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let id = args.integer("id")?;
            let book: BookRequest = args.object("livro")?;
            let updated = clients.books.update_book(id, &book).await?;
            Ok(if updated { Self::UPDATED } else { Self::REJECTED }.to_string())
        }
        .boxed()
    }
}
