//! Book catalog API client.
//!
//! Thin typed wrapper over the book service's CRUD endpoints:
//! `GET livros[?titulo=]`, `GET livros/autor/{autor}`, `POST livros` and
//! `PUT livros/{id}`. "No content" and "not found" answers on lookups are
//! reported as empty lists, never as errors.

use chrono::NaiveDateTime;
use reqwest::{Client, Response, StatusCode, Url, header::LOCATION};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::error::{BackendError, BackendResult};

/// Name used for this backend in errors and logs.
pub const BOOKS_BACKEND: &str = "books API";

/// Id reported for a created book when the backend's answer carries no usable id.
///
/// Callers must treat it as "created, id unknown".
pub const UNKNOWN_BOOK_ID: i64 = 0;

/// A book as stored by the catalog service.
///
/// Read from the backend's camelCase JSON; written out as `Id`/`Titulo`/`Autor`/`Date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct BookRecord {
    #[serde(alias = "Id")]
    pub id: i64,

    #[serde(alias = "Titulo", default)]
    pub titulo: String,

    #[serde(alias = "Autor", default)]
    pub autor: String,

    /// Creation timestamp assigned by the backend.
    #[serde(
        alias = "Date",
        default,
        deserialize_with = "flexible_date::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDateTime>,
}

/// Payload for creating or updating a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BookRequest {
    /// Title of the book.
    #[serde(alias = "Titulo")]
    #[schemars(description = "Título do livro")]
    pub titulo: String,

    /// Author of the book.
    #[serde(alias = "Autor")]
    #[schemars(description = "Autor do livro")]
    pub autor: String,
}

impl BookRequest {
    pub fn new(titulo: impl Into<String>, autor: impl Into<String>) -> Self {
        Self {
            titulo: titulo.into(),
            autor: autor.into(),
        }
    }
}

/// Body sent on update; the backend rejects bodies whose id differs from the path.
#[derive(Serialize)]
struct UpdateBody<'a> {
    id: i64,
    #[serde(flatten)]
    book: &'a BookRequest,
}

/// HTTP client for the book catalog API.
#[derive(Debug, Clone)]
pub struct BooksClient {
    client: Client,
    base_url: String,
}

impl BooksClient {
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

    /// Build an endpoint URL below the base address, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> BackendResult<Url> {
        let mut url = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| BackendError::invalid_url(BOOKS_BACKEND, e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::invalid_url(BOOKS_BACKEND, "base address cannot have a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// List books, optionally filtered by title.
    #[instrument(skip(self))]
    pub async fn list_books(&self, title: Option<&str>) -> BackendResult<Vec<BookRecord>> {
        let mut request = self.client.get(self.endpoint(&["livros"])?);
        if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
            request = request.query(&[("titulo", title)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::unavailable(BOOKS_BACKEND, e))?;
        read_books(response).await
    }

    /// List the books of one author.
    #[instrument(skip(self))]
    pub async fn list_books_by_author(&self, author: &str) -> BackendResult<Vec<BookRecord>> {
        let url = self.endpoint(&["livros", "autor", author])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::unavailable(BOOKS_BACKEND, e))?;
        read_books(response).await
    }

    /// Create a book.
    ///
    /// Returns `None` when the backend rejects the request. On success the id
    /// comes from the `Location` header, then from the body; if neither holds
    /// one, [`UNKNOWN_BOOK_ID`] is returned instead of failing.
    #[instrument(skip(self, book), fields(titulo = %book.titulo))]
    pub async fn create_book(&self, book: &BookRequest) -> BackendResult<Option<i64>> {
        let response = self
            .client
            .post(self.endpoint(&["livros"])?)
            .json(book)
            .send()
            .await
            .map_err(|e| BackendError::unavailable(BOOKS_BACKEND, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Book creation rejected with status {}", status);
            return Ok(None);
        }

        let from_header = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(id_from_location);
        if let Some(id) = from_header {
            info!("Created book {}", id);
            return Ok(Some(id));
        }

        let body = response.bytes().await.ok();
        let id = body.as_deref().and_then(id_from_body).unwrap_or_else(|| {
            warn!("Created book but could not read its id, reporting {}", UNKNOWN_BOOK_ID);
            UNKNOWN_BOOK_ID
        });
        Ok(Some(id))
    }

    /// Update a book; `true` iff the backend answered with a success status.
    #[instrument(skip(self, book))]
    pub async fn update_book(&self, id: i64, book: &BookRequest) -> BackendResult<bool> {
        let id_segment = id.to_string();
        let url = self.endpoint(&["livros", id_segment.as_str()])?;
        let response = self
            .client
            .put(url)
            .json(&UpdateBody { id, book })
            .send()
            .await
            .map_err(|e| BackendError::unavailable(BOOKS_BACKEND, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Book {} update rejected with status {}", id, status);
        }
        Ok(status.is_success())
    }
}

/// Decode a lookup response into a list of books.
async fn read_books(response: Response) -> BackendResult<Vec<BookRecord>> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
        debug!("Book lookup returned {}, treating as empty", status);
        return Ok(Vec::new());
    }
    if !status.is_success() {
        return Err(BackendError::status(BOOKS_BACKEND, status));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| BackendError::unavailable(BOOKS_BACKEND, e))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let body: Value = serde_json::from_slice(&bytes)
        .map_err(|e| BackendError::decode(BOOKS_BACKEND, e.to_string()))?;

    // The author lookup answers with a single object.
    let books = match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => serde_json::from_value(body),
        Value::Object(_) => serde_json::from_value(body).map(|book: BookRecord| vec![book]),
        other => {
            return Err(BackendError::decode(
                BOOKS_BACKEND,
                format!("expected a list of books, got {}", other),
            ));
        }
    };
    books.map_err(|e| BackendError::decode(BOOKS_BACKEND, e.to_string()))
}

/// Extract the trailing numeric segment of a `Location` header.
fn id_from_location(location: &str) -> Option<i64> {
    let path = location.split(['?', '#']).next()?;
    path.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// Extract an id from a creation response body: a bare number or an object with `id`.
fn id_from_body(body: &[u8]) -> Option<i64> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map
            .get("id")
            .or_else(|| map.get("Id"))
            .and_then(Value::as_i64)
            .filter(|id| *id != UNKNOWN_BOOK_ID),
        _ => None,
    }
}

/// Lenient timestamp decoding: RFC 3339 with offset, or a naive ISO timestamp.
mod flexible_date {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    fn parse(raw: &str) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_local())
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> BooksClient {
        BooksClient::new(Client::new(), server.base_url())
    }

    #[test]
    fn test_id_from_location() {
        assert_eq!(id_from_location("https://host/api/livros/42"), Some(42));
        assert_eq!(id_from_location("/livros/7/"), Some(7));
        assert_eq!(id_from_location("/livros/7?x=1"), Some(7));
        assert_eq!(id_from_location("/livros/abc"), None);
    }

    #[test]
    fn test_id_from_body() {
        assert_eq!(id_from_body(b"15"), Some(15));
        assert_eq!(id_from_body(br#"{"id": 9, "titulo": "x"}"#), Some(9));
        assert_eq!(id_from_body(br#"{"id": 0}"#), None);
        assert_eq!(id_from_body(b"not json"), None);
    }

    #[test]
    fn test_book_record_accepts_pascal_case_and_offsets() {
        let book: BookRecord = serde_json::from_value(json!({
            "Id": 1,
            "Titulo": "Dune",
            "Autor": "Herbert",
            "Date": "2024-05-01T10:00:00.1234567-03:00"
        }))
        .unwrap();
        assert_eq!(book.id, 1);
        assert_eq!(book.titulo, "Dune");
        assert!(book.date.is_some());

        let naive: BookRecord =
            serde_json::from_value(json!({"id": 2, "titulo": "a", "autor": "b", "date": "2024-05-01T10:00:00"}))
                .unwrap();
        assert!(naive.date.is_some());
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_escapes() {
        let client = BooksClient::new(Client::new(), "https://localhost:7294/api/");
        let url = client.endpoint(&["livros", "autor", "Machado de Assis"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://localhost:7294/api/livros/autor/Machado%20de%20Assis"
        );
    }

    #[tokio::test]
    async fn test_list_books_no_content_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/livros");
                then.status(204);
            })
            .await;

        let books = client_for(&server).list_books(None).await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_list_books_with_title_filter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/livros").query_param("titulo", "Dune");
                then.status(200).json_body(json!([
                    {"id": 1, "titulo": "Dune", "autor": "Herbert", "date": "2024-01-01T00:00:00"}
                ]));
            })
            .await;

        let books = client_for(&server).list_books(Some("Dune")).await.unwrap();
        mock.assert_async().await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].autor, "Herbert");
    }

    #[tokio::test]
    async fn test_list_books_server_error_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/livros");
                then.status(500);
            })
            .await;

        let err = client_for(&server).list_books(None).await.unwrap_err();
        assert!(matches!(err, BackendError::Status { .. }));
    }

    #[tokio::test]
    async fn test_list_books_unreachable_backend() {
        let client = BooksClient::new(Client::new(), "http://127.0.0.1:1");
        let err = client.list_books(None).await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_list_books_by_author_single_object_and_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/livros/autor/Herbert");
                then.status(200)
                    .json_body(json!({"id": 3, "titulo": "Dune", "autor": "Herbert"}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/livros/autor/Nobody");
                then.status(404).body("Nenhum livro encontrado para o autor Nobody.");
            })
            .await;

        let client = client_for(&server);
        let books = client.list_books_by_author("Herbert").await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, 3);

        let none = client.list_books_by_author("Nobody").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_create_book_reads_location_header() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/livros")
                    .json_body(json!({"titulo": "Dune", "autor": "Herbert"}));
                then.status(201)
                    .header("Location", "http://books.local/api/livros/42")
                    .json_body(json!({"id": 0, "titulo": "Dune", "autor": "Herbert"}));
            })
            .await;

        let id = client_for(&server)
            .create_book(&BookRequest::new("Dune", "Herbert"))
            .await
            .unwrap();
        assert_eq!(id, Some(42));
    }

    #[tokio::test]
    async fn test_create_book_falls_back_to_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/livros");
                then.status(200).body("17");
            })
            .await;

        let id = client_for(&server)
            .create_book(&BookRequest::new("Dune", "Herbert"))
            .await
            .unwrap();
        assert_eq!(id, Some(17));
    }

    // Known approximation: an unreadable id is reported as UNKNOWN_BOOK_ID.
    #[tokio::test]
    async fn test_create_book_without_id_uses_sentinel() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/livros");
                then.status(201).body("created");
            })
            .await;

        let id = client_for(&server)
            .create_book(&BookRequest::new("Dune", "Herbert"))
            .await
            .unwrap();
        assert_eq!(id, Some(UNKNOWN_BOOK_ID));
    }

    #[tokio::test]
    async fn test_create_book_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/livros");
                then.status(400);
            })
            .await;

        let id = client_for(&server)
            .create_book(&BookRequest::new("", ""))
            .await
            .unwrap();
        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_update_book_sends_id_in_body() {
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/livros/5")
                    .json_body(json!({"id": 5, "titulo": "Dune", "autor": "Frank Herbert"}));
                then.status(200);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/livros/6");
                then.status(404);
            })
            .await;

        let client = client_for(&server);
        let book = BookRequest::new("Dune", "Frank Herbert");
        assert!(client.update_book(5, &book).await.unwrap());
        ok.assert_async().await;
        assert!(!client.update_book(6, &book).await.unwrap());
    }
}
