//! Todo API server.
//!
//! HTTP layer over `todo_core`: routes, middleware, configuration and the
//! choice of repository.

pub mod admin;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use todo_core::{
    DocumentClient, DocumentStoreTodoRepository, InMemoryTodoRepository, TodoRepository,
    TodoService, Transport, UreqTransport,
};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, StorageBackend};

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub service: TodoService,
    pub app_env: String,
}

impl AppState {
    pub fn new(service: TodoService, app_env: impl Into<String>) -> Self {
        Self {
            service,
            app_env: app_env.into(),
        }
    }
}

/// Build the repository selected by `config`. Called once per process; the
/// document-store variant owns the process's only HTTP connection pool.
pub fn build_repository(config: &Config) -> Arc<dyn TodoRepository> {
    match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryTodoRepository::new()),
        StorageBackend::DocumentStore => {
            let client = DocumentClient::new(&config.docstore_url, &config.docstore_database);
            let transport: Arc<dyn Transport> = Arc::new(UreqTransport::new());
            Arc::new(DocumentStoreTodoRepository::new(client, transport))
        }
    }
}

/// Create the API router
pub fn app(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route("/todos/paged", get(handlers::list_todos_paged))
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .with_state(state);
    middleware::apply(router)
}

pub async fn run(listener: TcpListener, state: Arc<AppState>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();
}
