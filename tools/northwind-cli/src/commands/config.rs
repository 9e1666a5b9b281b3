//! Configuration commands.

use std::fs;

use anyhow::{bail, Result};
use northwind_app::AppConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.info(&format!("Loaded from {}", path.display())),
        None => ctx.output.info("No config file found, using defaults"),
    }
    println!("{}", ctx.config.to_toml()?);
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("northwind.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, AppConfig::default().to_toml()?)?;
    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}
