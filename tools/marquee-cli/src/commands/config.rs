//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { origin, force } => init_config(&origin, force, ctx),
        ConfigCommand::Path => show_path(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let mut redacted = ctx.config.clone();
        if redacted.api.api_token.is_some() {
            redacted.api.api_token = Some("(set)".to_string());
        }
        ctx.output.json(&redacted);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    let config = &ctx.config;

    ctx.output.info("[api]");
    ctx.output.kv(
        "base_url",
        config.api.base_url.as_deref().unwrap_or("(not set)"),
    );
    ctx.output.kv(
        "api_token",
        if config.api_token().is_some() {
            "(set)"
        } else {
            "(not set)"
        },
    );
    ctx.output
        .kv("create_checkout", &config.api.endpoints.create_checkout);

    ctx.output.info("[checkout]");
    ctx.output.kv("origin", &config.checkout.origin);
    let urls = config.checkout.return_urls();
    ctx.output.kv("success_url", &urls.success);
    ctx.output.kv("failure_url", &urls.failure);
    ctx.output.kv("currency", config.checkout.currency.code());
    ctx.output
        .kv("rounding", &format!("{:?}", config.checkout.rounding));

    ctx.output.info("[storage]");
    ctx.output
        .kv("directory", &ctx.storage_dir().display().to_string());
    ctx.output.kv("namespace", &config.storage.namespace);

    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level);
    ctx.output
        .kv("format", &format!("{:?}", config.logging.format).to_lowercase());

    Ok(())
}

fn init_config(origin: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(origin))?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) => println!("{}", path.display()),
        None => ctx
            .output
            .warn("No config file found. Run `marquee config init` to create one."),
    }
    Ok(())
}
