//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use std::fmt::Display;

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DeleteConfirmation, ErrorBody, Todo, TodoInput};

/// Synchronous, stateless client for the todo API.
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

    fn collection(&self) -> String {
        format!("{}/todos/", self.base_url)
    }

    fn item(&self, id: impl Display) -> String {
        format!("{}/todos/{id}", self.base_url)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.collection())
    }

    pub fn build_get_todo(&self, id: impl Display) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item(id))
    }

    pub fn build_create_todo(&self, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Post, self.collection()).with_json_body(to_json(input)?))
    }

    /// Full replacement: every field of `input` overwrites the stored record.
    pub fn build_update_todo(
        &self,
        id: impl Display,
        input: &TodoInput,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Put, self.item(id)).with_json_body(to_json(input)?))
    }

    pub fn build_delete_todo(&self, id: impl Display) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.item(id))
    }

    pub fn parse_list_todos<I: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Todo<I>>, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_get_todo<I: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Todo<I>, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_create_todo<I: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Todo<I>, ApiError> {
        check_status(&response, 201)?;
        from_json(&response.body)
    }

    pub fn parse_update_todo<I: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Todo<I>, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_delete_todo<I: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<DeleteConfirmation<I>, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }
}

fn to_json(input: &TodoInput) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
///
/// The server's `{"error", "detail"}` body is decoded when present; anything
/// else keeps the raw body text.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let structured = serde_json::from_str::<ErrorBody>(&response.body).ok();
    match (response.status, structured) {
        (404, body) => Err(ApiError::NotFound {
            detail: body.map_or_else(|| response.body.clone(), |b| b.detail),
        }),
        (400..=499, Some(body)) if body.error != "not_found" => Err(ApiError::Validation {
            status: response.status,
            detail: body.detail,
        }),
        _ => Err(ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        }),
    }
}
