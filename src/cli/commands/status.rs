//! Status command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_status(config: &Config) -> anyhow::Result<()> {
    let store = Store::connect(&config.database).await?;

    let todos = store.count_todos().await?;
    let users = store.count_users().await?;

    println!("Database: {}", config.database.url);
    println!("{:-<40}", "");
    println!("Todos: {todos}");
    println!("Users: {users}");

    store.close().await
}
