//! Ollama API client.
//!
//! Wraps the subset of the Ollama HTTP API used by the gateway:
//! `POST api/generate`, `GET api/tags`, `POST api/pull` and `POST api/embeddings`.
//! Generated text is treated as opaque.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::error::{BackendError, BackendResult};

/// Name used for this backend in errors and logs.
pub const OLLAMA_BACKEND: &str = "Ollama";

/// Text returned when the model answers with an empty response field.
pub const NO_MODEL_RESPONSE: &str = "Sem resposta do modelo";

/// Text returned by [`OllamaClient::list_models`] when no model is installed.
pub const NO_MODELS_FOUND: &str = "Nenhum modelo encontrado";

/// Text returned when the embeddings endpoint yields no vector.
pub const NO_EMBEDDINGS: &str = "Não foi possível gerar embeddings";

/// Optional sampling parameters forwarded as Ollama `options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Maximum number of tokens to generate.
    #[serde(
        default,
        rename = "num_predict",
        alias = "max_tokens",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_tokens: Option<i64>,
}

impl GenerationOptions {
    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.max_tokens.is_none()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a GenerationOptions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Option<Vec<ModelInfo>>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    modified_at: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    embedding: Option<Vec<f64>>,
}

/// Human-readable summary of an installed model.
///
/// Serialized as `Nome`/`Tamanho`/`UltimoUso`, the keys existing clients read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelSummary {
    pub nome: String,
    pub tamanho: String,
    pub ultimo_uso: Option<String>,
}

/// HTTP client for the Ollama API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client sharing the given connection pool.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base address this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> BackendResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::unavailable(OLLAMA_BACKEND, e))?;
        ensure_success(response)
    }

    /// Generate a completion for `prompt`.
    ///
    /// A null or empty `response` field yields [`NO_MODEL_RESPONSE`].
    #[instrument(skip(self, prompt, options), fields(prompt_len = prompt.len()))]
    pub async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        options: Option<&GenerationOptions>,
    ) -> BackendResult<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: options.filter(|o| !o.is_empty()),
            images: Vec::new(),
        };
        self.generate(&request).await
    }

    /// Generate a completion about an image given as a URL or as raw/base64 data.
    #[instrument(skip(self, image, prompt))]
    pub async fn analyze_image(
        &self,
        model: &str,
        image: &str,
        prompt: &str,
    ) -> BackendResult<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: None,
            images: vec![encode_image(image)],
        };
        self.generate(&request).await
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> BackendResult<String> {
        let response = self.post_json("api/generate", request).await?;
        let body: GenerateResponse = read_json(response).await?;
        Ok(body
            .response
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_MODEL_RESPONSE.to_string()))
    }

    /// Installed models as typed summaries.
    #[instrument(skip(self))]
    pub async fn models(&self) -> BackendResult<Vec<ModelSummary>> {
        let response = self
            .client
            .get(self.endpoint("api/tags"))
            .send()
            .await
            .map_err(|e| BackendError::unavailable(OLLAMA_BACKEND, e))?;
        let tags: TagsResponse = read_json(ensure_success(response)?).await?;

        Ok(tags
            .models
            .unwrap_or_default()
            .into_iter()
            .map(|m| ModelSummary {
                nome: m.name,
                tamanho: format_size(m.size),
                ultimo_uso: m.modified_at,
            })
            .collect())
    }

    /// Installed models serialized as JSON, or [`NO_MODELS_FOUND`].
    pub async fn list_models(&self) -> BackendResult<String> {
        let models = self.models().await?;
        if models.is_empty() {
            return Ok(NO_MODELS_FOUND.to_string());
        }
        serde_json::to_string(&models).map_err(|e| BackendError::decode(OLLAMA_BACKEND, e.to_string()))
    }

    /// Start downloading a model and acknowledge immediately.
    ///
    /// Only the response head is awaited; the progress stream is drained on a
    /// detached task. There is no way to poll or cancel the download.
    #[instrument(skip(self))]
    pub async fn pull_model(&self, name: &str) -> BackendResult<String> {
        let response = self
            .post_json("api/pull", &json!({ "name": name, "stream": true }))
            .await?;

        tokio::spawn(drain_pull(name.to_string(), response));

        Ok(format!(
            "Iniciado o download do modelo {}. Este processo pode demorar dependendo do tamanho do modelo.",
            name
        ))
    }

    /// Compute an embedding and summarize it (dimension count and first five values).
    #[instrument(skip(self, text))]
    pub async fn generate_embeddings(&self, model: &str, text: &str) -> BackendResult<String> {
        let response = self
            .post_json("api/embeddings", &json!({ "model": model, "prompt": text }))
            .await?;
        let body: EmbeddingsResponse = read_json(response).await?;

        let embedding = match body.embedding {
            Some(values) if !values.is_empty() => values,
            _ => return Ok(NO_EMBEDDINGS.to_string()),
        };
        let preview: Vec<String> = embedding.iter().take(5).map(f64::to_string).collect();
        Ok(format!(
            "Embedding gerado com {} dimensões. Primeiros valores: [{}...]",
            embedding.len(),
            preview.join(", ")
        ))
    }
}

fn ensure_success(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BackendError::status(OLLAMA_BACKEND, status))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| BackendError::unavailable(OLLAMA_BACKEND, e))?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::decode(OLLAMA_BACKEND, e.to_string()))
}

async fn drain_pull(model: String, mut response: Response) {
    let mut received = 0usize;
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => received += chunk.len(),
            Ok(None) => {
                info!(model = %model, bytes = received, "Model pull stream finished");
                return;
            }
            Err(e) => {
                warn!(model = %model, "Model pull stream interrupted: {}", e);
                return;
            }
        }
    }
}

/// Absolute URLs pass through; anything else is base64-encoded as UTF-8 text.
fn encode_image(image: &str) -> String {
    if Url::parse(image).is_ok() {
        image.to_string()
    } else {
        STANDARD.encode(image.as_bytes())
    }
}

/// Format a byte count as `B/KB/MB/GB/TB` with at most two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut order = 0;
    while size >= 1024.0 && order < UNITS.len() - 1 {
        order += 1;
        size /= 1024.0;
    }

    let formatted = format!("{:.2}", size);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[order])
}
