//! `SeaORM` implementation of the `TodoService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::db::Store;
use crate::domain::{ObjectId, Todo, TodoPatch, normalize_text};
use crate::services::todo_service::{TodoError, TodoService};

pub struct SeaOrmTodoService {
    store: Store,
}

impl SeaOrmTodoService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn parse_id(id: &str) -> Result<ObjectId, TodoError> {
    ObjectId::parse(id).map_err(|_| TodoError::InvalidId(id.to_string()))
}

#[async_trait]
impl TodoService for SeaOrmTodoService {
    async fn create(&self, text: &str) -> Result<Todo, TodoError> {
        let text = normalize_text(text)
            .ok_or_else(|| TodoError::Validation("Todo text is required".to_string()))?;

        let todo = Todo {
            id: ObjectId::new(),
            text,
            completed: false,
            completed_at: None,
            creator: None,
        };

        self.store.insert_todo(&todo).await?;
        info!(id = %todo.id, "Created todo");

        Ok(todo)
    }

    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.store.list_todos().await?)
    }

    async fn get_by_id(&self, id: &str) -> Result<Todo, TodoError> {
        let object_id = parse_id(id)?;

        self.store
            .get_todo(&object_id)
            .await?
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, patch: TodoPatch) -> Result<Todo, TodoError> {
        let object_id = parse_id(id)?;

        if patch.is_empty() {
            debug!(%object_id, "Empty patch, returning current todo");
            return self.get_by_id(id).await;
        }

        let text = match patch.text {
            Some(raw) => Some(normalize_text(&raw).ok_or_else(|| {
                TodoError::Validation("Todo text cannot be empty".to_string())
            })?),
            None => None,
        };

        let updated = self
            .store
            .update_todo(&object_id, text, patch.completed, Utc::now())
            .await?
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;

        info!(id = %updated.id, completed = updated.completed, "Updated todo");
        Ok(updated)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Todo, TodoError> {
        let object_id = parse_id(id)?;

        let removed = self
            .store
            .delete_todo(&object_id)
            .await?
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;

        info!(id = %removed.id, "Deleted todo");
        Ok(removed)
    }

    async fn count(&self) -> Result<u64, TodoError> {
        Ok(self.store.count_todos().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> SeaOrmTodoService {
        let path = std::env::temp_dir().join(format!("todo-api-todos-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", path.display()))
            .await
            .expect("failed to open store");
        SeaOrmTodoService::new(store)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let svc = service().await;

        let created = svc.create("  Test todo text ").await.unwrap();
        let fetched = svc.get_by_id(created.id.as_str()).await.unwrap();

        assert_eq!(fetched.text, "Test todo text");
        assert!(!fetched.completed);
        assert_eq!(fetched.completed_at, None);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_text() {
        let svc = service().await;

        assert!(matches!(svc.create("   ").await, Err(TodoError::Validation(_))));
        assert_eq!(svc.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_and_missing_ids() {
        let svc = service().await;
        svc.create("keep me").await.unwrap();
        let absent = ObjectId::new().to_string();

        assert!(matches!(svc.get_by_id("123abc").await, Err(TodoError::InvalidId(_))));
        assert!(matches!(svc.get_by_id(&absent).await, Err(TodoError::NotFound(_))));

        let patch = TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        };
        assert!(matches!(
            svc.update("123abc", patch.clone()).await,
            Err(TodoError::InvalidId(_))
        ));
        assert!(matches!(svc.update(&absent, patch).await, Err(TodoError::NotFound(_))));

        assert!(matches!(svc.delete_by_id("123abc").await, Err(TodoError::InvalidId(_))));
        assert!(matches!(svc.delete_by_id(&absent).await, Err(TodoError::NotFound(_))));

        assert_eq!(svc.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_completion_invariant_holds_across_updates() {
        let svc = service().await;
        let todo = svc.create("First").await.unwrap();
        let id = todo.id.to_string();

        let done = svc
            .update(
                &id,
                TodoPatch {
                    completed: Some(true),
                    text: Some("Updated".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());
        assert_eq!(done.text, "Updated");

        // text-only patch leaves completion untouched
        let renamed = svc
            .update(
                &id,
                TodoPatch {
                    text: Some("Renamed".to_string()),
                    completed: None,
                },
            )
            .await
            .unwrap();
        assert!(renamed.completed);
        assert_eq!(renamed.completed_at, done.completed_at);

        let undone = svc
            .update(
                &id,
                TodoPatch {
                    completed: Some(false),
                    text: None,
                },
            )
            .await
            .unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.completed_at, None);

        let stored = svc.get_by_id(&id).await.unwrap();
        assert_eq!(stored, undone);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_text() {
        let svc = service().await;
        let todo = svc.create("First").await.unwrap();

        let result = svc
            .update(
                todo.id.as_str(),
                TodoPatch {
                    text: Some("  ".to_string()),
                    completed: None,
                },
            )
            .await;
        assert!(matches!(result, Err(TodoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_patch_returns_current() {
        let svc = service().await;
        let todo = svc.create("First").await.unwrap();

        let same = svc
            .update(todo.id.as_str(), TodoPatch::default())
            .await
            .unwrap();
        assert_eq!(same, todo);
    }

    #[tokio::test]
    async fn test_delete_returns_prior_document() {
        let svc = service().await;
        let first = svc.create("First").await.unwrap();
        let second = svc.create("Second").await.unwrap();

        let removed = svc.delete_by_id(second.id.as_str()).await.unwrap();
        assert_eq!(removed, second);

        let remaining = svc.list_all().await.unwrap();
        assert_eq!(remaining, vec![first]);
        assert!(matches!(
            svc.get_by_id(second.id.as_str()).await,
            Err(TodoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let svc = service().await;
        let a = svc.create("a").await.unwrap();
        let b = svc.create("b").await.unwrap();
        let c = svc.create("c").await.unwrap();

        assert_eq!(svc.list_all().await.unwrap(), vec![a, b, c]);
    }
}
