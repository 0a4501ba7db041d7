//! HTTP transport implementation.
//!
//! A REST surface over the same dispatcher and backend clients as the stdio
//! transport: tool discovery, the OpenAPI document, generic tool execution,
//! and a few passthrough endpoints for clients such as Open WebUI.
//!
//! Business failures (unknown tool, backend down) come back as 200 with the
//! dispatcher's text. Only malformed requests get a 400 and only unexpected
//! faults (including handler panics) get a 500 `{error}` body.

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::{HeaderName, HeaderValue, Method};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::any::Any;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::schema::{openapi::OPENAPI_VERSION, openapi_document, tool_list};

pub const BANNER: &str = "MCP Server HTTP API - Use /api/tools para ver ferramentas disponíveis";

const GENERATE_PARAMS_REQUIRED: &str = "Parâmetros 'model' e 'prompt' são obrigatórios";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: McpServer,
}

/// Body of `POST /api/execute`.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    #[serde(alias = "Tool")]
    pub tool: String,

    #[serde(default, alias = "Parameters")]
    pub parameters: Option<Map<String, Value>>,
}

/// Body of `POST /api/ollama/generate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, alias = "Model")]
    pub model: Option<String>,

    #[serde(default, alias = "Prompt")]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BooksQuery {
    titulo: Option<String>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the application router with every route and layer.
    pub fn router(server: McpServer, enable_cors: bool) -> Router {
        let routes = Router::new()
            .route("/", get(root_handler))
            .route("/api/tools", get(list_tools))
            .route("/api/openapi.json", get(openapi))
            .route("/openapi.json", get(openapi))
            .route("/api/execute", post(execute_tool))
            .route("/api/ollama/models", get(ollama_models))
            .route("/api/ollama/generate", post(ollama_generate))
            .route("/api/status", get(status))
            .route("/api/livros", get(list_books))
            .route("/api/livros/autor/{autor}", get(list_books_by_author))
            .with_state(AppState { server });

        with_layers(routes, enable_cors)
    }

    /// Bind the listening socket.
    ///
    /// Kept apart from [`HttpTransport::serve`] so a taken port fails startup
    /// instead of a background task.
    pub async fn bind(&self) -> TransportResult<TcpListener> {
        let addr = self.address();
        TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))
    }

    /// Serve requests on an already-bound listener until it stops.
    pub async fn serve(self, listener: TcpListener, server: McpServer) -> TransportResult<()> {
        let app = Self::router(server, self.config.enable_cors);

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "HTTP ready - listening on {} (CORS {})",
            self.address(),
            cors_status
        );
        info!("  → Tools:    GET  /api/tools");
        info!("  → Execute:  POST /api/execute");
        info!("  → OpenAPI:  GET  /api/openapi.json");
        info!("  → Status:   GET  /api/status");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Wrap routes with the layers every response goes through.
fn with_layers(routes: Router, enable_cors: bool) -> Router {
    let app = routes.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static("x-openapi-version"),
                HeaderValue::from_static(OPENAPI_VERSION),
            ))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn(short_circuit_options)),
    );

    if enable_cors {
        let cors_layer = CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods(cors::Any)
            .allow_headers(cors::Any);
        app.layer(cors_layer)
    } else {
        app
    }
}

/// JSON `{error}` body with the given status.
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Answer any `OPTIONS` request with an empty 200.
async fn short_circuit_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("HTTP handler panicked: {}", detail);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Erro interno: {}", detail))
}

/// Root handler - plain-text banner.
async fn root_handler() -> &'static str {
    BANNER
}

async fn list_tools(State(state): State<AppState>) -> impl IntoResponse {
    Json(tool_list(state.server.catalog()))
}

async fn openapi(State(state): State<AppState>) -> impl IntoResponse {
    Json(openapi_document(state.server.catalog()))
}

/// Execute any catalog tool.
#[instrument(skip_all)]
async fn execute_tool(
    State(state): State<AppState>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected execute request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    info!("Executing tool via HTTP: {}", request.tool);
    let params = request.parameters.unwrap_or_default();
    let result = state.server.dispatcher().execute(&request.tool, &params).await;

    Json(json!({ "result": result })).into_response()
}

async fn ollama_models(State(state): State<AppState>) -> Response {
    match state.server.clients().ollama.models().await {
        Ok(models) => Json(models).into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Erro ao listar modelos: {}", e),
        ),
    }
}

#[instrument(skip_all)]
async fn ollama_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected generate request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let model = request.model.as_deref().filter(|s| !s.is_empty());
    let prompt = request.prompt.as_deref().filter(|s| !s.is_empty());
    let (Some(model), Some(prompt)) = (model, prompt) else {
        return error_response(StatusCode::BAD_REQUEST, GENERATE_PARAMS_REQUIRED);
    };

    match state
        .server
        .clients()
        .ollama
        .generate_text(model, prompt, None)
        .await
    {
        Ok(text) => Json(json!({ "response": text })).into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Erro ao gerar resposta: {}", e),
        ),
    }
}

/// Per-backend connectivity; always 200.
async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.server.clients().check_connectivity().await)
}

async fn list_books(State(state): State<AppState>, Query(query): Query<BooksQuery>) -> Response {
    match state
        .server
        .clients()
        .books
        .list_books(query.titulo.as_deref())
        .await
    {
        Ok(books) => Json(books).into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Erro ao buscar livros: {}", e),
        ),
    }
}

async fn list_books_by_author(
    State(state): State<AppState>,
    Path(autor): Path<String>,
) -> Response {
    match state.server.clients().books.list_books_by_author(&autor).await {
        Ok(books) => Json(books).into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Erro ao buscar livros por autor: {}", e),
        ),
    }
}
