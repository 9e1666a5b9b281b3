//! Northwind CLI - local tooling for the Northwind Traders browser.
//!
//! Commands:
//! - `northwind render <path>` - Render a page against a local database
//! - `northwind seed` - Create the sample database
//! - `northwind routes` - List the route table
//! - `northwind config` - Show or create `northwind.toml`

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, RenderArgs, SeedArgs};

/// Render and inspect the Northwind Traders browser locally
#[derive(Parser)]
#[command(name = "northwind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page and show each streamed chunk
    Render(RenderArgs),

    /// Create the sample database
    Seed(SeedArgs),

    /// List the route table
    Routes,

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let result = match cli.command {
        Commands::Render(args) => commands::render::run(args, &ctx).await,
        Commands::Seed(args) => commands::seed::run(args, &ctx),
        Commands::Routes => commands::routes::run(&ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
