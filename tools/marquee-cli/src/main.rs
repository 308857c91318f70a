//! Marquee CLI - a terminal storefront over the Marquee cart and checkout.
//!
//! Commands:
//! - `marquee cart` - Add, remove, update, list and clear cart items
//! - `marquee checkout` - Check out the cart
//! - `marquee buy` - Buy a single item without the cart
//! - `marquee donate` - Donate to an artist
//! - `marquee return` - Resume after the payment provider redirects back
//! - `marquee status` - Check a payment session
//! - `marquee config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod navigator;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    BuyArgs, CartArgs, CheckoutArgs, ConfigArgs, DonateArgs, ReturnArgs, StatusArgs,
};

/// Marquee CLI - Manage your cart and check out from the terminal
#[derive(Parser)]
#[command(name = "marquee")]
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
    /// Manage the cart
    Cart(CartArgs),

    /// Check out the cart
    Checkout(CheckoutArgs),

    /// Buy a single item without adding it to the cart
    Buy(BuyArgs),

    /// Donate to an artist
    Donate(DonateArgs),

    /// Resume after returning from the payment provider
    Return(ReturnArgs),

    /// Check the status of a payment session
    Status(StatusArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), output)?;
    logging::init(&ctx.config.logging, cli.verbose)?;

    // Execute command
    let result = match cli.command {
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Buy(args) => commands::buy::run(args, &ctx).await,
        Commands::Donate(args) => commands::donate::run(args, &ctx).await,
        Commands::Return(args) => commands::returns::run(args, &ctx).await,
        Commands::Status(args) => commands::status::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
