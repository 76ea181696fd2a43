//! Persistence checks against a real sqlite file.

use std::path::PathBuf;
use std::sync::Arc;
use todo_api::config::SecurityConfig;
use todo_api::db::Store;
use todo_api::domain::TodoPatch;
use todo_api::services::{SeaOrmTodoService, SeaOrmUserService, TodoService, UserService};

fn temp_db_url() -> (PathBuf, String) {
    let path =
        std::env::temp_dir().join(format!("todo-api-store-test-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite:{}", path.display());
    (path, url)
}

fn fast_security() -> SecurityConfig {
    SecurityConfig {
        token_secret: "abc123".to_string(),
        argon2_memory_cost_kib: 256,
        argon2_time_cost: 1,
        ..SecurityConfig::default()
    }
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let (path, url) = temp_db_url();

    let (todo_id, token) = {
        let store = Store::new(&url).await.expect("failed to open store");
        let todos = SeaOrmTodoService::new(store.clone());
        let users = SeaOrmUserService::new(store.clone(), fast_security());

        let todo = todos.create("Persist me").await.unwrap();
        todos
            .update(
                todo.id.as_str(),
                TodoPatch {
                    text: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap();
        let session = users.register("keep@example.com", "123abc!").await.unwrap();

        store.close().await.unwrap();
        (todo.id, session.token)
    };

    assert!(path.exists());

    // Reopening runs the migrator again over an up-to-date schema
    let store = Store::new(&url).await.expect("failed to reopen store");
    let todos = SeaOrmTodoService::new(store.clone());
    let users = SeaOrmUserService::new(store.clone(), fast_security());

    let todo = todos.get_by_id(todo_id.as_str()).await.unwrap();
    assert_eq!(todo.text, "Persist me");
    assert!(todo.completed);
    assert!(todo.completed_at.is_some());

    let user = users.authenticate(&token).await.unwrap();
    assert_eq!(user.email, "keep@example.com");

    store.close().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_logins_keep_every_token() {
    let (_path, url) = temp_db_url();
    let store = Store::new(&url).await.expect("failed to open store");
    let users = Arc::new(SeaOrmUserService::new(store, fast_security()));

    users.register("busy@example.com", "123abc!").await.unwrap();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let users = Arc::clone(&users);
            tokio::spawn(async move { users.login("busy@example.com", "123abc!").await })
        })
        .collect();

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap().unwrap().token);
    }

    for token in &tokens {
        assert!(users.authenticate(token).await.is_ok());
    }

    let user = users.authenticate(&tokens[0]).await.unwrap();
    assert_eq!(user.tokens.session_count(), 6);
}
