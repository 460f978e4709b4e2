//! In-memory todo CRUD service.
//!
//! # Overview
//! A [`TodoStore`] holds every record for the life of the process. Handlers
//! receive it as shared state; nothing is global.
//!
//! # Design
//! - The store is generic over an [`IdScheme`]: random UUIDs or sequential
//!   integers, chosen at startup.
//! - Request bodies are decoded into explicit schema types and validated
//!   before they reach the store.
//! - Every client-caused failure is an [`AppError`] rendered as a JSON body;
//!   missing records are always a 404, never a panic.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod store;
pub mod types;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{IdKind, ServerConfig};
pub use error::AppError;
pub use store::{IdScheme, RandomIds, SequentialIds, TodoStore, UpdateMode};
pub use types::{Deleted, NewTodo, Todo, TodoPayload};

use handlers::{create_todo, delete_todo, get_todo, list_todos, update_todo};

/// Default router: UUID ids, strict updates, empty store, no CORS.
pub fn app() -> Router {
    router(Arc::new(TodoStore::<RandomIds>::default()), false)
}

/// Router over an existing store.
pub fn router<S: IdScheme>(store: Arc<TodoStore<S>>, cors: bool) -> Router {
    let mut router = Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todos/", get(list_todos::<S>).post(create_todo::<S>))
        .route(
            "/todos/{id}",
            get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>),
        )
        .with_state(store)
        .layer(TraceLayer::new_for_http());

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Builds the store described by `config` and wraps it in a router.
pub async fn build_router(config: &ServerConfig) -> error::Result<Router> {
    Ok(match config.id_scheme {
        IdKind::Uuid => router(new_store::<RandomIds>(config).await?, config.cors),
        IdKind::Sequential => router(new_store::<SequentialIds>(config).await?, config.cors),
    })
}

async fn new_store<S: IdScheme + Default>(
    config: &ServerConfig,
) -> error::Result<Arc<TodoStore<S>>> {
    let mode = config.update_mode.into();
    let store = if config.seed {
        TodoStore::<S>::seeded(mode).await?
    } else {
        TodoStore::<S>::new(mode)
    };
    Ok(Arc::new(store))
}

/// Serves `config`'s router on `listener` until `shutdown` resolves or the
/// listener fails.
pub async fn run<F>(
    listener: TcpListener,
    config: &ServerConfig,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(config).await.map_err(std::io::Error::other)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
