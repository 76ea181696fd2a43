//! Migrate command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    // Connecting applies every pending migration.
    let store = Store::connect(&config.database).await?;
    store.close().await?;

    println!("Database at {} is up to date.", config.database.url);
    Ok(())
}
