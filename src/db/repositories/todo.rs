use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryOrder, Set,
};
use tracing::debug;

use crate::domain::{ObjectId, Todo, completion_timestamp};
use crate::entities::{prelude::*, todos};

/// Repository for todo documents
pub struct TodoRepository {
    conn: DatabaseConnection,
}

impl TodoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: todos::Model) -> Result<Todo> {
        let id = ObjectId::parse(&model.id).context("Stored todo has a malformed id")?;
        let creator = model
            .creator
            .as_deref()
            .map(ObjectId::parse)
            .transpose()
            .context("Stored todo has a malformed creator id")?;

        Ok(Todo {
            id,
            text: model.text,
            completed: model.completed,
            completed_at: model.completed_at,
            creator,
        })
    }

    pub async fn insert(&self, todo: &Todo) -> Result<()> {
        let active_model = todos::ActiveModel {
            id: Set(todo.id.to_string()),
            text: Set(todo.text.clone()),
            completed: Set(todo.completed),
            completed_at: Set(todo.completed_at),
            creator: Set(todo.creator.as_ref().map(ToString::to_string)),
        };

        Todos::insert(active_model)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert todo")?;

        debug!(id = %todo.id, "Inserted todo");
        Ok(())
    }

    /// All todos in creation order.
    pub async fn list_all(&self) -> Result<Vec<Todo>> {
        let rows = Todos::find()
            .order_by_asc(todos::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list todos")?;

        rows.into_iter().map(Self::map_model).collect()
    }

    pub async fn get(&self, id: &ObjectId) -> Result<Option<Todo>> {
        let row = Todos::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query todo by id")?;

        row.map(Self::map_model).transpose()
    }

    /// Applies a partial update in one UPDATE statement. `completed` and
    /// `completed_at` are always written together. Returns `None` when no
    /// row has this id.
    pub async fn update(
        &self,
        id: &ObjectId,
        text: Option<String>,
        completed: Option<bool>,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>> {
        let mut active = todos::ActiveModel {
            id: Unchanged(id.to_string()),
            ..Default::default()
        };

        if let Some(text) = text {
            active.text = Set(text);
        }
        if let Some(completed) = completed {
            active.completed = Set(completed);
            active.completed_at = Set(completion_timestamp(completed, now));
        }

        match active.update(&self.conn).await {
            Ok(model) => Self::map_model(model).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e).context("Failed to update todo"),
        }
    }

    /// Removes a todo and returns it as it was before removal.
    pub async fn delete(&self, id: &ObjectId) -> Result<Option<Todo>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let result = Todos::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete todo")?;

        // lost a race with another delete
        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(existing))
    }

    pub async fn count(&self) -> Result<u64> {
        Todos::find()
            .count(&self.conn)
            .await
            .context("Failed to count todos")
    }
}
