//! Command-line interface.

mod commands;

use clap::{Parser, Subcommand};

/// REST backend for a personal todo list with user accounts
#[derive(Parser)]
#[command(name = "todo-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Show how many todos and users are stored
    Status,

    /// Create default config file
    #[command(alias = "init")]
    InitConfig,
}

pub use commands::*;
