//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! A [`Gateway`](crate::Gateway) executes the round-trip in between, keeping
//! this layer deterministic and free of I/O.
//!
//! The collection lives at the base address itself: `GET {base}/` lists,
//! `POST {base}/` creates, and `{base}/{todo_id}` addresses a single item.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Envelope, Todo, TodoId, TodoList, UpdateTodo};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// Synchronous, stateless client for the todo API.
///
/// Every request it builds carries the JSON content-type header, mutation
/// bodies included or not.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.collection_path(), None)
    }

    pub fn build_get_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_path(id), None)
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, self.collection_path(), Some(body)))
    }

    /// PUT with no payload. The server decides the new completion state.
    pub fn build_toggle_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Put, self.item_path(id), None)
    }

    pub fn build_update_todo(&self, id: TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(HttpMethod::Put, self.item_path(id), Some(body)))
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_path(id), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        let envelope: Envelope<TodoList> = decode(&response.body)?;
        Ok(envelope.data.0)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        let envelope: Envelope<Todo> = decode(&response.body)?;
        Ok(envelope.data)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn collection_path(&self) -> String {
        format!("{}/", self.base_url)
    }

    fn item_path(&self, id: TodoId) -> String {
        format!("{}/{id}", self.base_url)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let (key, value) = JSON_CONTENT_TYPE;
        HttpRequest {
            method,
            path,
            headers: vec![(key.to_string(), value.to_string())],
            body,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
