//! Ollama tools: model management, text generation, image analysis and embeddings.

use futures::FutureExt;

use super::ToolDefinition;
use crate::domains::backends::{BackendClients, GenerationOptions};
use crate::domains::tools::catalog::ToolFuture;
use crate::domains::tools::params::{ParamType, ParameterSpec, ToolArguments};

fn model_parameter() -> ParameterSpec {
    ParameterSpec::required("model", "Nome do modelo a ser usado", ParamType::String)
}

fn prompt_parameter() -> ParameterSpec {
    ParameterSpec::required("prompt", "Texto da pergunta ou prompt", ParamType::String)
}

// ============================================================================
// ListModels
// ============================================================================

pub struct ListModelsTool;

impl ToolDefinition for ListModelsTool {
    const NAME: &'static str = "ListModels";
    const DESCRIPTION: &'static str = "Lista os modelos disponíveis no Ollama";
    const FAILURE: &'static str = "Erro ao listar modelos";

    fn parameters() -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn execute(clients: BackendClients, _args: ToolArguments) -> ToolFuture {
        async move { Ok(clients.ollama.list_models().await?) }.boxed()
    }
}

// ============================================================================
// GenerateResponse
// ============================================================================

pub struct GenerateResponseTool;

impl ToolDefinition for GenerateResponseTool {
    const NAME: &'static str = "GenerateResponse";
    const DESCRIPTION: &'static str = "Gera uma resposta usando um modelo do Ollama";
    const FAILURE: &'static str = "Erro ao gerar texto";

    fn parameters() -> Vec<ParameterSpec> {
        vec![model_parameter(), prompt_parameter()]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let text = clients
                .ollama
                .generate_text(args.text("model")?, args.text("prompt")?, None)
                .await?;
            Ok(text)
        }
        .boxed()
    }
}

// ============================================================================
// GerarTextoAvancado
// ============================================================================

/// Text generation with sampling options.
pub struct GerarTextoAvancadoTool;

impl ToolDefinition for GerarTextoAvancadoTool {
    const NAME: &'static str = "GerarTextoAvancado";
    const DESCRIPTION: &'static str =
        "Gera texto com um modelo do Ollama ajustando temperatura, top_p e limite de tokens";
    const FAILURE: &'static str = "Erro ao gerar resposta com parâmetros";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            model_parameter(),
            prompt_parameter(),
            ParameterSpec::optional(
                "temperature",
                "Temperatura de amostragem (ex: 0.7)",
                ParamType::Number,
            ),
            ParameterSpec::optional("top_p", "Amostragem nucleus (ex: 0.9)", ParamType::Number),
            ParameterSpec::optional(
                "max_tokens",
                "Número máximo de tokens a gerar",
                ParamType::Integer,
            ),
        ]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let options = GenerationOptions {
                temperature: args.optional_number("temperature"),
                top_p: args.optional_number("top_p"),
                max_tokens: args.optional_integer("max_tokens"),
            };
            let text = clients
                .ollama
                .generate_text(args.text("model")?, args.text("prompt")?, Some(&options))
                .await?;
            Ok(text)
        }
        .boxed()
    }
}

// ============================================================================
// AnalisarImagem
// ============================================================================

pub struct AnalisarImagemTool;

impl ToolDefinition for AnalisarImagemTool {
    const NAME: &'static str = "AnalisarImagem";
    const DESCRIPTION: &'static str = "Analisa uma imagem com um modelo multimodal do Ollama";
    const FAILURE: &'static str = "Erro ao analisar imagem";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required(
                "model",
                "Nome do modelo multimodal (ex: llava)",
                ParamType::String,
            ),
            ParameterSpec::required(
                "imagem",
                "URL da imagem ou conteúdo em base64",
                ParamType::String,
            ),
            ParameterSpec::required(
                "prompt",
                "Pergunta ou instrução sobre a imagem",
                ParamType::String,
            ),
        ]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let text = clients
                .ollama
                .analyze_image(args.text("model")?, args.text("imagem")?, args.text("prompt")?)
                .await?;
            Ok(text)
        }
        .boxed()
    }
}

// ============================================================================
// GerarEmbeddings
// ============================================================================

pub struct GerarEmbeddingsTool;

impl ToolDefinition for GerarEmbeddingsTool {
    const NAME: &'static str = "GerarEmbeddings";
    const DESCRIPTION: &'static str = "Gera embeddings de um texto com um modelo do Ollama";
    const FAILURE: &'static str = "Erro ao gerar embeddings";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            model_parameter(),
            ParameterSpec::required("texto", "Texto a ser convertido em embedding", ParamType::String),
        ]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move {
            let summary = clients
                .ollama
                .generate_embeddings(args.text("model")?, args.text("texto")?)
                .await?;
            Ok(summary)
        }
        .boxed()
    }
}

// ============================================================================
// BaixarModelo
// ============================================================================

pub struct BaixarModeloTool;

impl ToolDefinition for BaixarModeloTool {
    const NAME: &'static str = "BaixarModelo";
    const DESCRIPTION: &'static str = "Baixa um modelo para o Ollama";
    const FAILURE: &'static str = "Erro ao baixar modelo";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required(
            "nome_modelo",
            "Nome do modelo a baixar (ex: llama3, gemma:7b)",
            ParamType::String,
        )]
    }

    fn execute(clients: BackendClients, args: ToolArguments) -> ToolFuture {
        async move { Ok(clients.ollama.pull_model(args.text("nome_modelo")?).await?) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{OFFLINE, clients, run};
    use super::*;
    use crate::domains::tools::error::ToolError;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_models_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(200).json_body(json!({"models": []}));
            })
            .await;

        let text = run::<ListModelsTool>(clients(OFFLINE, &server.base_url()), json!({}))
            .await
            .unwrap();
        assert_eq!(text, "Nenhum modelo encontrado");
    }

    #[tokio::test]
    async fn test_generate_response_passes_text_through() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body_partial(r#"{"model": "llama3", "prompt": "Oi", "stream": false}"#);
                then.status(200).json_body(json!({"response": "Olá!"}));
            })
            .await;

        let text = run::<GenerateResponseTool>(
            clients(OFFLINE, &server.base_url()),
            json!({"model": "llama3", "prompt": "Oi"}),
        )
        .await
        .unwrap();
        assert_eq!(text, "Olá!");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_advanced_generation_sends_options() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate").json_body_partial(
                    r#"{"options": {"temperature": 0.2, "top_p": 0.9, "num_predict": 64}}"#,
                );
                then.status(200).json_body(json!({"response": "ok"}));
            })
            .await;

        let text = run::<GerarTextoAvancadoTool>(
            clients(OFFLINE, &server.base_url()),
            json!({
                "model": "llama3",
                "prompt": "Oi",
                "temperature": 0.2,
                "top_p": "0.9",
                "max_tokens": 64
            }),
        )
        .await
        .unwrap();
        assert_eq!(text, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_analyze_image_requires_image() {
        let err = run::<AnalisarImagemTool>(
            clients(OFFLINE, OFFLINE),
            json!({"model": "llava", "prompt": "O que é isto?"}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::MissingParameter(ref name) if name == "imagem"));
    }

    #[tokio::test]
    async fn test_embeddings_summary() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/embeddings");
                then.status(200)
                    .json_body(json!({"embedding": [0.5, 0.25, 1.0, 2.0, 3.0, 4.0]}));
            })
            .await;

        let text = run::<GerarEmbeddingsTool>(
            clients(OFFLINE, &server.base_url()),
            json!({"model": "nomic-embed-text", "texto": "livro"}),
        )
        .await
        .unwrap();
        assert_eq!(
            text,
            "Embedding gerado com 6 dimensões. Primeiros valores: [0.5, 0.25, 1, 2, 3...]"
        );
    }

    #[tokio::test]
    async fn test_pull_model_acknowledges() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/pull");
                then.status(200).body("{\"status\":\"success\"}\n");
            })
            .await;

        let text = run::<BaixarModeloTool>(
            clients(OFFLINE, &server.base_url()),
            json!({"nome_modelo": "gemma:7b"}),
        )
        .await
        .unwrap();
        assert!(text.starts_with("Iniciado o download do modelo gemma:7b."));
    }

    #[tokio::test]
    async fn test_offline_backend_is_an_error() {
        let err = run::<ListModelsTool>(clients(OFFLINE, OFFLINE), json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Backend(_)));
    }
}
