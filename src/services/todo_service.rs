//! Domain service for todo items.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Todo, TodoPatch};

/// Errors specific to todo operations.
///
/// `InvalidId` and `NotFound` are kept apart here for logging; the HTTP layer
/// renders both as 404.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid todo id: {0}")]
    InvalidId(String),

    #[error("Todo {0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for TodoError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TodoError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait]
pub trait TodoService: Send + Sync {
    /// Creates an incomplete todo.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if `text` is empty after trimming.
    async fn create(&self, text: &str) -> Result<Todo, TodoError>;

    async fn list_all(&self) -> Result<Vec<Todo>, TodoError>;

    async fn get_by_id(&self, id: &str) -> Result<Todo, TodoError>;

    /// Applies `patch`. Setting `completed` also sets or clears `completedAt`.
    async fn update(&self, id: &str, patch: TodoPatch) -> Result<Todo, TodoError>;

    /// Removes a todo and returns the removed document.
    async fn delete_by_id(&self, id: &str) -> Result<Todo, TodoError>;

    async fn count(&self) -> Result<u64, TodoError>;
}
