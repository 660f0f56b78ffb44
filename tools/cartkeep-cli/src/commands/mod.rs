//! CLI command implementations.

pub mod cart;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub id: String,

    /// Display name.
    #[arg(short, long, default_value = "")]
    pub title: String,

    /// Unit price.
    #[arg(short, long, value_parser = parse_price)]
    pub price: f64,

    /// Image URL.
    #[arg(short, long, default_value = "")]
    pub image_url: String,
}

/// Parse a unit price, refusing NaN and infinities.
fn parse_price(value: &str) -> Result<f64, String> {
    let price: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if price.is_finite() {
        Ok(price)
    } else {
        Err(format!("`{value}` is not a finite price"))
    }
}

/// Arguments for commands addressing a single line.
#[derive(Args)]
pub struct ItemArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
