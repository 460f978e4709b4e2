//! HTTP handlers for the `/todos` resource.
//!
//! Handlers are generic over the store's [`IdScheme`], so the same code
//! serves UUID and integer ids. Body and path extraction go through
//! [`AppJson`] and [`IdPath`], which turn axum's rejections into [`AppError`].

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, Result};
use crate::store::{IdScheme, TodoStore};
use crate::types::{Deleted, Todo, TodoPayload};

pub type SharedStore<S> = Arc<TodoStore<S>>;

/// JSON body extractor with structured rejections.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path id extractor with structured rejections.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct IdPath<T>(pub T);

pub async fn list_todos<S: IdScheme>(
    State(store): State<SharedStore<S>>,
) -> Json<Vec<Todo<S::Id>>> {
    Json(store.list().await)
}

pub async fn create_todo<S: IdScheme>(
    State(store): State<SharedStore<S>>,
    AppJson(payload): AppJson<TodoPayload<S::Id>>,
) -> Result<(StatusCode, Json<Todo<S::Id>>)> {
    let todo = payload.validate(None)?;
    let todo = store.create(todo).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_todo<S: IdScheme>(
    State(store): State<SharedStore<S>>,
    IdPath(id): IdPath<S::Id>,
) -> Result<Json<Todo<S::Id>>> {
    store.get(&id).await.map(Json)
}

pub async fn update_todo<S: IdScheme>(
    State(store): State<SharedStore<S>>,
    IdPath(id): IdPath<S::Id>,
    AppJson(payload): AppJson<TodoPayload<S::Id>>,
) -> Result<Json<Todo<S::Id>>> {
    let todo = payload.validate(Some(&id))?;
    store.update(id, todo).await.map(Json)
}

pub async fn delete_todo<S: IdScheme>(
    State(store): State<SharedStore<S>>,
    IdPath(id): IdPath<S::Id>,
) -> Result<Json<Deleted<S::Id>>> {
    let todo = store.delete(&id).await?;
    Ok(Json(Deleted::new(todo)))
}
