//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently, so
//! the client does not pull in axum. Integration tests catch schema drift.
//! `Todo` is generic over the id so one client works against a server running
//! either id scheme; it defaults to `Uuid`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo<I = Uuid> {
    pub id: I,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
}

/// Request payload for both create and update. An update replaces every
/// field, so omitting `description` clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl TodoInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
        }
    }
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteConfirmation<I = Uuid> {
    pub message: String,
    pub todo: Todo<I>,
}

/// Structured error body sent by the server on any 4xx.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    pub detail: String,
}
