//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::json;
use todo_core::{pagination, NewTodo, Page, PageRequest, StoreError, TodoEntity, TodoPatch};

use crate::error::AppError;
use crate::AppState;

/// Run a blocking service call on tokio's blocking pool.
async fn run_blocking<T, F>(call: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(call).await??)
}

fn require_title(title: &str) -> Result<(), AppError> {
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "env": state.app_env }))
}

/// All todos, oldest first
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TodoEntity>>, AppError> {
    let service = state.service.clone();
    let todos = run_blocking(move || service.list_todos()).await?;
    Ok(Json(todos))
}

/// One page of todos, see `todo_core::pagination` for cursor semantics.
///
/// When the listing length is a multiple of `limit` the last page is full and
/// still carries a cursor, and following it starts over from the first item.
/// Clients walking the chain must stop on a short page or on an id they have
/// already seen.
pub async fn list_todos_paged(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Page>, AppError> {
    let Query(request) = query?;
    let service = state.service.clone();
    let todos = run_blocking(move || service.list_todos()).await?;
    Ok(Json(pagination::paginate(todos, &request)))
}

pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TodoEntity>, AppError> {
    let service = state.service.clone();
    run_blocking(move || service.get_todo(&id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoEntity>), AppError> {
    let Json(input) = payload?;
    require_title(&input.title)?;
    let service = state.service.clone();
    let created = run_blocking(move || service.create_todo(input)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<TodoEntity>, AppError> {
    let Json(patch) = payload?;
    if let Some(title) = &patch.title {
        require_title(title)?;
    }
    let service = state.service.clone();
    run_blocking(move || service.update_todo(&id, patch))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let service = state.service.clone();
    if run_blocking(move || service.delete_todo(&id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
