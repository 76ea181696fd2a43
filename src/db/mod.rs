use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::{AuthToken, ObjectId, Todo, User};

pub mod migrator;
pub mod repositories;

/// Handle to the document database.
///
/// Constructed explicitly at startup and passed to every service; cloning is
/// cheap (the pool is shared). Call [`Store::close`] on shutdown.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Self::with_pool_options(&config.url, config.max_connections, config.min_connections).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite:")
                .trim_start_matches("//")
                .split('?')
                .next()
                .unwrap_or_default();
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !path_str.is_empty() && !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to database: {db_url}"))?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    /// Closes the pool. Outstanding clones of this store become unusable.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .context("Failed to close database connection")?;
        info!("Database connection closed");
        Ok(())
    }

    fn todo_repo(&self) -> repositories::todo::TodoRepository {
        repositories::todo::TodoRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn insert_todo(&self, todo: &Todo) -> Result<()> {
        self.todo_repo().insert(todo).await
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>> {
        self.todo_repo().list_all().await
    }

    pub async fn get_todo(&self, id: &ObjectId) -> Result<Option<Todo>> {
        self.todo_repo().get(id).await
    }

    pub async fn update_todo(
        &self,
        id: &ObjectId,
        text: Option<String>,
        completed: Option<bool>,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>> {
        self.todo_repo().update(id, text, completed, now).await
    }

    pub async fn delete_todo(&self, id: &ObjectId) -> Result<Option<Todo>> {
        self.todo_repo().delete(id).await
    }

    pub async fn count_todos(&self) -> Result<u64> {
        self.todo_repo().count().await
    }

    pub async fn create_user(
        &self,
        id: &ObjectId,
        email: &str,
        password_hash: &str,
        token: &AuthToken,
    ) -> Result<bool> {
        self.user_repo()
            .create_with_token(id, email, password_hash, token)
            .await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn get_user(&self, id: &ObjectId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn add_user_token(&self, user_id: &ObjectId, token: &AuthToken) -> Result<()> {
        self.user_repo().add_token(user_id, token).await
    }

    pub async fn remove_user_token(&self, user_id: &ObjectId, token: &AuthToken) -> Result<bool> {
        self.user_repo().remove_token(user_id, token).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }
}
