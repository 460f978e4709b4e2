//! Wire schema for todo records and the request payload.
//!
//! Incoming bodies are decoded into [`TodoPayload`] and then checked by
//! [`TodoPayload::validate`], which produces the [`NewTodo`] the store accepts.
//! Nothing reaches the store without passing through that check.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A stored todo record as returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo<I> {
    pub id: I,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Request body for create and update.
///
/// `id` is accepted so a client can send back a record it fetched, but the
/// store always decides the id.
#[derive(Debug, Deserialize)]
pub struct TodoPayload<I> {
    pub id: Option<I>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// The mutable fields of a record after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub(crate) fn into_todo<I>(self, id: I) -> Todo<I> {
        Todo {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
        }
    }
}

impl<I: PartialEq + std::fmt::Display> TodoPayload<I> {
    /// Checks the payload against the schema rules.
    ///
    /// An empty or whitespace-only title is rejected.
    ///
    /// `path_id` is the id from the URL on update; a body id that disagrees
    /// with it is rejected. On create pass `None` and any body id is dropped.
    pub fn validate(self, path_id: Option<&I>) -> Result<NewTodo> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be blank".to_string()));
        }
        if let (Some(body_id), Some(path_id)) = (&self.id, path_id) {
            if body_id != path_id {
                return Err(AppError::Validation(format!(
                    "body id {body_id} does not match path id {path_id}"
                )));
            }
        }
        Ok(NewTodo {
            title: self.title,
            description: self.description,
            completed: self.completed,
        })
    }
}

/// Response body for a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted<I> {
    pub message: &'static str,
    pub todo: Todo<I>,
}

impl<I> Deleted<I> {
    pub fn new(todo: Todo<I>) -> Self {
        Self {
            message: "Todo deleted",
            todo,
        }
    }
}
