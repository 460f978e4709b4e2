//! In-memory todo store.
//!
//! One `RwLock` guards both the id generator and the record map, and every
//! operation takes it exactly once, so each call is a single atomic step.
//! The store is created at startup and shared with handlers through an `Arc`.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::types::{NewTodo, Todo};

/// Source of store-assigned ids.
pub trait IdScheme: Send + Sync + 'static {
    type Id: Clone
        + Ord
        + fmt::Debug
        + fmt::Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Returns `None` once the scheme has no ids left to hand out.
    fn next_id(&mut self) -> Option<Self::Id>;

    /// Called when a record is inserted under a caller-chosen id (upsert).
    fn observe(&mut self, _id: &Self::Id) {}
}

/// Random UUID v4 ids.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdScheme for RandomIds {
    type Id = Uuid;

    fn next_id(&mut self) -> Option<Uuid> {
        Some(Uuid::new_v4())
    }
}

/// Integer ids starting at 1. Deleted ids are never handed out again.
///
/// `next` is `None` after `u64::MAX` has been used.
#[derive(Debug)]
pub struct SequentialIds {
    next: Option<u64>,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl IdScheme for SequentialIds {
    type Id = u64;

    fn next_id(&mut self) -> Option<u64> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    fn observe(&mut self, id: &u64) {
        if self.next.is_some_and(|next| *id >= next) {
            self.next = id.checked_add(1);
        }
    }
}

/// What `update` does when the id is not in the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Fail with `NotFound`.
    #[default]
    Strict,
    /// Insert the record under the requested id.
    Upsert,
}

/// Records loaded by [`TodoStore::seeded`].
pub fn seed_todos() -> Vec<NewTodo> {
    vec![
        NewTodo::new("Buy milk").with_description("2%"),
        NewTodo::new("Walk the dog"),
        NewTodo::new("Read the axum docs")
            .with_description("routing and extractors")
            .completed(true),
    ]
}

struct Inner<S: IdScheme> {
    ids: S,
    todos: BTreeMap<S::Id, Todo<S::Id>>,
}

pub struct TodoStore<S: IdScheme> {
    inner: RwLock<Inner<S>>,
    mode: UpdateMode,
}

impl<S: IdScheme + Default> TodoStore<S> {
    pub fn new(mode: UpdateMode) -> Self {
        Self::with_ids(S::default(), mode)
    }

    /// A store pre-filled with [`seed_todos`].
    pub async fn seeded(mode: UpdateMode) -> Result<Self> {
        let store = Self::new(mode);
        for todo in seed_todos() {
            store.create(todo).await?;
        }
        Ok(store)
    }
}

impl<S: IdScheme> TodoStore<S> {
    pub fn with_ids(ids: S, mode: UpdateMode) -> Self {
        Self {
            inner: RwLock::new(Inner {
                ids,
                todos: BTreeMap::new(),
            }),
            mode,
        }
    }

    /// Stores `todo` under a fresh id. Fails with `IdsExhausted` when the
    /// scheme cannot produce an id that is not already in use.
    pub async fn create(&self, todo: NewTodo) -> Result<Todo<S::Id>> {
        let mut inner = self.inner.write().await;
        let id = loop {
            let id = inner.ids.next_id().ok_or(AppError::IdsExhausted)?;
            if !inner.todos.contains_key(&id) {
                break id;
            }
        };
        let todo = todo.into_todo(id.clone());
        inner.todos.insert(id.clone(), todo.clone());
        tracing::debug!(%id, "todo created");
        Ok(todo)
    }

    /// All records in ascending id order.
    pub async fn list(&self) -> Vec<Todo<S::Id>> {
        self.inner.read().await.todos.values().cloned().collect()
    }

    pub async fn get(&self, id: &S::Id) -> Result<Todo<S::Id>> {
        self.inner
            .read()
            .await
            .todos
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(id))
    }

    /// Replaces every mutable field of the record at `id`; the id is kept.
    pub async fn update(&self, id: S::Id, todo: NewTodo) -> Result<Todo<S::Id>> {
        let mut inner = self.inner.write().await;
        if !inner.todos.contains_key(&id) {
            if self.mode == UpdateMode::Strict {
                tracing::debug!(%id, "update of missing todo");
                return Err(AppError::not_found(&id));
            }
            inner.ids.observe(&id);
            tracing::debug!(%id, "todo upserted");
        }
        let todo = todo.into_todo(id.clone());
        inner.todos.insert(id.clone(), todo.clone());
        tracing::debug!(%id, "todo updated");
        Ok(todo)
    }

    /// Removes and returns the record at `id`.
    pub async fn delete(&self, id: &S::Id) -> Result<Todo<S::Id>> {
        let removed = self.inner.write().await.todos.remove(id);
        match removed {
            Some(todo) => {
                tracing::debug!(%id, "todo deleted");
                Ok(todo)
            }
            None => {
                tracing::debug!(%id, "delete of missing todo");
                Err(AppError::not_found(id))
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<S: IdScheme + Default> Default for TodoStore<S> {
    fn default() -> Self {
        Self::new(UpdateMode::Strict)
    }
}

impl<S: IdScheme> fmt::Debug for TodoStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoStore").field("mode", &self.mode).finish_non_exhaustive()
    }
}
