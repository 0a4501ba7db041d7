//! OpenAPI 3.0 document for the HTTP transport.
//!
//! The paths are the curated set of JSON routes the HTTP transport serves,
//! not one path per tool. The catalog only contributes the list of valid
//! tool names for `/api/execute`.

use serde_json::{Value, json};

use crate::domains::tools::ToolCatalog;

pub const OPENAPI_VERSION: &str = "3.0.0";

const TITLE: &str = "MCP Server API";
const DESCRIPTION: &str = "API para o MCP Server integrado com Ollama e API de Livros";

/// The uniform 200/400/500 response set.
fn responses() -> Value {
    let object = json!({
        "application/json": { "schema": { "type": "object" } }
    });
    json!({
        "200": { "description": "Operação bem-sucedida", "content": object },
        "400": { "description": "Requisição inválida", "content": object },
        "500": { "description": "Erro interno do servidor", "content": object },
    })
}

fn operation(operation_id: &str, summary: &str) -> Value {
    json!({
        "operationId": operation_id,
        "summary": summary,
        "responses": responses(),
    })
}

fn with(mut op: Value, key: &str, value: Value) -> Value {
    if let Some(map) = op.as_object_mut() {
        map.insert(key.to_string(), value);
    }
    op
}

fn json_body(schema: Value) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema } }
    })
}

/// Build the OpenAPI document.
pub fn openapi_document(catalog: &ToolCatalog) -> Value {
    let execute_body = json_body(json!({
        "type": "object",
        "required": ["tool"],
        "properties": {
            "tool": {
                "type": "string",
                "description": "Nome da ferramenta",
                "enum": catalog.names(),
            },
            "parameters": {
                "type": "object",
                "description": "Parâmetros da ferramenta",
            }
        }
    }));

    let generate_body = json_body(json!({
        "type": "object",
        "required": ["model", "prompt"],
        "properties": {
            "model": { "type": "string", "description": "Nome do modelo a ser usado" },
            "prompt": { "type": "string", "description": "Texto da pergunta ou prompt" }
        }
    }));

    let titulo = json!([{
        "name": "titulo",
        "in": "query",
        "required": false,
        "description": "Filtra opcional pelo titulo do livro",
        "schema": { "type": "string" }
    }]);

    let autor = json!([{
        "name": "autor",
        "in": "path",
        "required": true,
        "description": "Nome do autor do livro",
        "schema": { "type": "string" }
    }]);

    json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": TITLE,
            "version": env!("CARGO_PKG_VERSION"),
            "description": DESCRIPTION,
        },
        "servers": [{ "url": "/" }],
        "paths": {
            "/api/tools": {
                "get": operation("listTools", "Lista as ferramentas disponíveis")
            },
            "/api/execute": {
                "post": with(
                    operation("executeTool", "Executa uma ferramenta"),
                    "requestBody",
                    execute_body,
                )
            },
            "/api/livros": {
                "get": with(
                    operation("listBooks", "Lista os livros, com filtro opcional por título"),
                    "parameters",
                    titulo,
                )
            },
            "/api/livros/autor/{autor}": {
                "get": with(
                    operation("listBooksByAuthor", "Lista os livros de um autor"),
                    "parameters",
                    autor,
                )
            },
            "/api/ollama/models": {
                "get": operation("listModels", "Lista os modelos disponíveis no Ollama")
            },
            "/api/ollama/generate": {
                "post": with(
                    operation("generateResponse", "Gera uma resposta usando um modelo do Ollama"),
                    "requestBody",
                    generate_body,
                )
            },
            "/api/status": {
                "get": operation("checkStatus", "Verifica a conectividade com a API de Livros e o Ollama")
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_header() {
        let doc = openapi_document(&ToolCatalog::standard());
        assert_eq!(doc["openapi"], "3.0.0");
        assert_eq!(doc["info"]["title"], "MCP Server API");
        assert_eq!(doc["servers"][0]["url"], "/");
    }

    #[test]
    fn test_every_operation_has_uniform_responses() {
        let doc = openapi_document(&ToolCatalog::standard());
        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 7);

        for (path, item) in paths {
            for (method, op) in item.as_object().unwrap() {
                assert!(op["operationId"].is_string(), "{} {}", method, path);
                let codes: Vec<_> = op["responses"].as_object().unwrap().keys().collect();
                assert_eq!(codes, vec!["200", "400", "500"], "{} {}", method, path);
            }
        }
    }

    #[test]
    fn test_execute_lists_catalog_tools() {
        let catalog = ToolCatalog::standard();
        let doc = openapi_document(&catalog);
        let tools = &doc["paths"]["/api/execute"]["post"]["requestBody"]["content"]
            ["application/json"]["schema"]["properties"]["tool"]["enum"];
        assert_eq!(tools.as_array().unwrap().len(), catalog.len());
    }

    #[test]
    fn test_document_is_deterministic() {
        let catalog = ToolCatalog::standard();
        let first = serde_json::to_string(&openapi_document(&catalog)).unwrap();
        let second = serde_json::to_string(&openapi_document(&catalog)).unwrap();
        assert_eq!(first, second);
    }
}
