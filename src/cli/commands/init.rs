//! Init config command handler

use crate::config::Config;

pub fn cmd_init_config() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml with default settings.");
        println!("Set security.token_secret (or TOKEN_SECRET) before serving.");
    } else {
        println!("config.toml already exists, leaving it untouched.");
    }

    Ok(())
}
