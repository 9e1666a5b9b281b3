//! CLI command implementations.

pub mod config;
pub mod render;
pub mod routes;
pub mod seed;

use clap::{Args, Subcommand};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Request path, with an optional query string (e.g. `/search?q=chai`).
    pub path: String,

    /// Artificial delay in milliseconds.
    #[arg(short, long, default_value = "0")]
    pub delay: u64,

    /// Stream regions as they settle instead of awaiting all data.
    #[arg(long)]
    pub defer: bool,

    /// SQLite file (default: `database.path` from the config).
    #[arg(long)]
    pub db: Option<String>,
}

/// Arguments for the seed command.
#[derive(Args)]
pub struct SeedArgs {
    /// SQLite file (default: `database.path` from the config).
    #[arg(long)]
    pub db: Option<String>,

    /// Drop and recreate the tables if they already exist.
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default `northwind.toml` in the current directory.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}
