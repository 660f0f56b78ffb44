//! cartkeep CLI - inspect and edit a persisted shopping cart.
//!
//! Commands:
//! - `cartkeep show` - Print the cart
//! - `cartkeep add` - Add one unit of a product
//! - `cartkeep inc` - Add one unit to a line
//! - `cartkeep dec` - Remove one unit from a line
//! - `cartkeep clear` - Empty the cart
//! - `cartkeep config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AddArgs, ClearArgs, ConfigArgs, ItemArgs};

/// cartkeep - a shopping cart that survives restarts
#[derive(Parser)]
#[command(name = "cartkeep")]
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
    /// Show the cart
    Show,

    /// Add one unit of a product, merging with an existing line
    Add(AddArgs),

    /// Add one unit to an existing line
    Inc(ItemArgs),

    /// Remove one unit from a line, dropping it at zero
    Dec(ItemArgs),

    /// Remove every line from the cart
    Clear(ClearArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init_logging(&ctx.config.logging, cli.verbose)?;

    // Execute command
    let result = match cli.command {
        Commands::Show => commands::cart::show(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Inc(args) => commands::cart::increment(args, &ctx).await,
        Commands::Dec(args) => commands::cart::decrement(args, &ctx).await,
        Commands::Clear(args) => commands::cart::clear(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
