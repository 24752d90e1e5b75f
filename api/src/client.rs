//! HTTP implementation of [`TodoService`]

use crate::{
    config::ApiConfig,
    error::{ApiError, ConfigError},
    service::TodoService,
    types::{NewTodo, Todo, TodoId, TodoPatch, UserId},
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;

/// Marker body the mock service returns for unknown records
const NOT_FOUND_MARKER: &str = "Not found";

/// Remote todo service over REST/JSON
#[derive(Clone, Debug)]
pub struct HttpTodoService {
    client: Client,
    base_url: Url,
}

impl HttpTodoService {
    /// Create a client for the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL cannot be parsed or
    /// cannot carry path segments, and [`ApiError::RequestFailed`] if the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::from_transport(&e))?;

        Ok(Self { client, base_url })
    }

    /// Create a client from `TODO_API_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid variables or an unusable base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ApiConfig::from_env()?;
        Self::new(&config).map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// The base URL requests are built from
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn todos_url(&self, user: &UserId) -> Result<Url, ApiError> {
        self.url(&["users", user.as_str(), "todos"])
    }

    fn todo_url(&self, user: &UserId, id: &TodoId) -> Result<Url, ApiError> {
        self.url(&["users", user.as_str(), "todos", id.as_str()])
    }

    /// Send a request and return its status with the raw body
    async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Received response");
        Ok((status, body))
    }
}

/// Decode a single todo, mapping the `"Not found"` marker and 404s
fn decode_todo(status: StatusCode, body: &str) -> Result<Todo, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if value.as_str() == Some(NOT_FOUND_MARKER) {
        return Err(ApiError::NotFound);
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a delete answer: the deleted record, or `None` when absent/falsy
fn decode_deleted(status: StatusCode, body: &str) -> Result<Option<Todo>, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(marker) if marker.is_empty() || marker == NOT_FOUND_MARKER => Ok(None),
        record => serde_json::from_value(record)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string())),
    }
}

#[async_trait]
impl TodoService for HttpTodoService {
    #[tracing::instrument(skip_all, fields(user = %user))]
    async fn list(&self, user: &UserId) -> Result<Vec<Todo>, ApiError> {
        let (status, body) = self.execute(self.client.get(self.todos_url(user)?)).await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    #[tracing::instrument(skip_all, fields(user = %user, todo = %id))]
    async fn get(&self, user: &UserId, id: &TodoId) -> Result<Todo, ApiError> {
        let (status, body) = self.execute(self.client.get(self.todo_url(user, id)?)).await?;
        decode_todo(status, &body)
    }

    #[tracing::instrument(skip_all, fields(user = %user))]
    async fn create(&self, user: &UserId, text: &str) -> Result<Todo, ApiError> {
        let request = self
            .client
            .post(self.todos_url(user)?)
            .json(&NewTodo::new(text));
        let (status, body) = self.execute(request).await?;
        decode_todo(status, &body)
    }

    #[tracing::instrument(skip_all, fields(user = %user, todo = %id))]
    async fn update(&self, user: &UserId, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let request = self.client.put(self.todo_url(user, id)?).json(patch);
        let (status, body) = self.execute(request).await?;
        decode_todo(status, &body)
    }

    #[tracing::instrument(skip_all, fields(user = %user, todo = %id))]
    async fn delete(&self, user: &UserId, id: &TodoId) -> Result<Option<Todo>, ApiError> {
        let (status, body) = self.execute(self.client.delete(self.todo_url(user, id)?)).await?;
        decode_deleted(status, &body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(base_url: &str) -> HttpTodoService {
        HttpTodoService::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn builds_nested_todo_urls() {
        let service = service("https://example.test/api/");
        let url = service
            .todo_url(&UserId::new("u1"), &TodoId::new("42"))
            .unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/users/u1/todos/42");
    }

    #[test]
    fn escapes_path_segments() {
        let service = service("https://example.test");
        let url = service.todos_url(&UserId::new("a/b")).unwrap();
        assert_eq!(url.as_str(), "https://example.test/users/a%2Fb/todos");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpTodoService::new(&ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn not_found_marker_is_an_error_for_updates() {
        let result = decode_todo(StatusCode::OK, "\"Not found\"");
        assert_eq!(result, Err(ApiError::NotFound));
    }

    #[test]
    fn falsy_delete_bodies_mean_absent() {
        for body in ["", "null", "false", "\"\"", "\"Not found\""] {
            assert_eq!(decode_deleted(StatusCode::OK, body), Ok(None), "body: {body}");
        }
    }

    #[test]
    fn server_errors_keep_status_and_body() {
        let result = decode_todo(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert_eq!(
            result,
            Err(ApiError::Status {
                status: 500,
                body: "oops".to_string(),
            })
        );
    }
}
