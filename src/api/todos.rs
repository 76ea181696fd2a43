use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::{require_field, validate_todo_id};
use super::{ApiError, AppState, CreateTodoRequest, TodoListResponse, TodoResponse};
use crate::domain::{Todo, TodoPatch};

/// POST /todos
/// Responds with the bare todo, not wrapped in `{todo}`.
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(payload) = payload?;
    let text = require_field(payload.text, "text")?;

    let todo = state.todo_service.create(&text).await?;
    Ok(Json(todo))
}

/// GET /todos
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TodoListResponse>, ApiError> {
    let todos = state.todo_service.list_all().await?;
    Ok(Json(TodoListResponse { todos }))
}

/// GET /todos/{id}
pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.todo_service.get_by_id(&id).await?;
    Ok(Json(TodoResponse { todo }))
}

/// PATCH /todos/{id}
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    // A malformed id is a 404 whatever the body looks like
    validate_todo_id(&id)?;
    let Json(patch) = payload?;

    let todo = state.todo_service.update(&id, patch).await?;
    Ok(Json(TodoResponse { todo }))
}

/// DELETE /todos/{id}
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.todo_service.delete_by_id(&id).await?;
    Ok(Json(TodoResponse { todo }))
}
