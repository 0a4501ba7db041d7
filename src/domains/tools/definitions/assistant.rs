//! Tools that combine the book catalog with a language model.
//!
//! Both tools fetch the full book list and embed it in the prompt sent to
//! Ollama; they differ only in how the list is rendered.

use futures::FutureExt;
use serde::Serialize;
use std::fmt::Write;

use super::ToolDefinition;
use crate::domains::backends::{BackendClients, BookRecord};
use crate::domains::tools::catalog::ToolFuture;
use crate::domains::tools::params::{ParamType, ParameterSpec, ToolArguments};

/// Result text when there is nothing to ask the model about.
pub const NO_BOOKS_TO_QUERY: &str = "Não há livros cadastrados para consultar.";

/// Build the question prompt: one line per book, then the user query.
pub fn book_query_prompt(books: &[BookRecord], query: &str) -> String {
    let mut context = String::from("Informações sobre os livros disponíveis:\n");
    for book in books {
        // Writing to a String cannot fail.
        let _ = writeln!(
            context,
            "ID: {}, Título: {}, Autor: {}",
            book.id, book.titulo, book.autor
        );
    }
    format!(
        "{}\n\nConsulta do usuário: {}\n\nResponda com base nas informações dos livros fornecidas acima:",
        context, query
    )
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TaskContext<'a> {
    livros: &'a [BookRecord],
    tarefa: &'a str,
}

/// Build the librarian prompt with the books and task serialized as JSON.
pub fn librarian_prompt(books: &[BookRecord], task: &str) -> serde_json::Result<String> {
    let payload = serde_json::to_string(&TaskContext {
        livros: books,
        tarefa: task,
    })?;
    Ok(format!(
        "Você é um assistente especializado em literatura e gestão de biblioteca. \
         Aqui está uma lista de livros em formato JSON: {}\n\n\
         Com base nesses dados, realize a seguinte tarefa: {}",
        payload, task
    ))
}

fn model_parameter(description: &'static str) -> ParameterSpec {
    ParameterSpec::required("modelo", description, ParamType::String)
}

// ============================================================================
// ConsultarLivrosComIA
// ============================================================================

/// Answer a question about the catalog.
pub struct ConsultarLivrosComIaTool;

impl ToolDefinition for ConsultarLivrosComIaTool {
    const NAME: &'static str = "ConsultarLivrosComIA";
    const DESCRIPTION: &'static str =
        "Consulta livros e analisa o resultado com um modelo do Ollama";
    const FAILURE: &'static str = "Erro ao processar consulta";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            model_parameter("Nome do modelo do Ollama a ser usado"),
            ParameterSpec::required(
                "consulta",
                "Consulta ou pergunta sobre livros",
                ParamType::String,
            ),
        ]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let model = args.text("modelo")?;
            let query = args.text("consulta")?;

            let books = clients.books.list_books(None).await?;
            if books.is_empty() {
                return Ok(NO_BOOKS_TO_QUERY.to_string());
            }

            let prompt = book_query_prompt(&books, query);
            Ok(clients.ollama.generate_text(model, &prompt, None).await?)
        }
        .boxed()
    }
}

// ============================================================================
// RealizarTarefaCompleta
// ============================================================================

/// Run a free-form librarian task over the catalog.
pub struct RealizarTarefaCompletaTool;

impl ToolDefinition for RealizarTarefaCompletaTool {
    const NAME: &'static str = "RealizarTarefaCompleta";
    const DESCRIPTION: &'static str =
        "Integração avançada entre a API de Livros e modelos do Ollama";
    const FAILURE: &'static str = "Erro ao processar tarefa";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            model_parameter("Nome do modelo a ser usado"),
            ParameterSpec::required(
                "tarefa",
                "Descrição da tarefa a ser realizada",
                ParamType::String,
            ),
        ]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let model = args.text("modelo")?;
            let task = args.text("tarefa")?;

            // An empty catalog is still sent; the model is told there are no books.
            let books = clients.books.list_books(None).await?;
            let prompt = librarian_prompt(&books, task)?;
            Ok(clients.ollama.generate_text(model, &prompt, None).await?)
        }
        .boxed()
    }
}
