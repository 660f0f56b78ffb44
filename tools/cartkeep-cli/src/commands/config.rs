//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    // Store section
    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("path", &ctx.config.store.path);
    ctx.output
        .kv("resolved", &ctx.store_dir().display().to_string());

    // Cart section
    let cart = &ctx.config.cart;
    ctx.output.info("");
    ctx.output.info("[cart]");
    ctx.output.kv("storage_key", &cart.storage_key);
    ctx.output.kv("write_mode", &format!("{:?}", cart.write_mode));
    ctx.output.kv("on_corrupt", &format!("{:?}", cart.on_corrupt));
    ctx.output
        .kv("retry.max_attempts", &cart.retry.max_attempts.to_string());
    ctx.output.kv("retry.backoff", &format!("{:?}", cart.retry.backoff));

    // Logging section
    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv("json", &ctx.config.logging.json.to_string());

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}
