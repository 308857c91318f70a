//! CLI command implementations.

pub mod buy;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod donate;
pub mod returns;
pub mod status;

use std::str::FromStr;

use clap::{Args, Subcommand};
use marquee_commerce::cart::{validate_unit_price, ItemKind};
use rust_decimal::Decimal;

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add one unit of an item.
    Add {
        /// Item ID.
        id: String,

        /// Display name.
        #[arg(short, long)]
        name: String,

        /// Unit price in major units, e.g. 9.99.
        #[arg(short, long, value_parser = parse_price)]
        price: Decimal,

        /// Item kind: product, gig or music.
        #[arg(short, long, default_value = "product", value_parser = parse_kind)]
        kind: ItemKind,

        /// Description shown at checkout.
        #[arg(short, long)]
        description: Option<String>,

        /// Image URL.
        #[arg(long)]
        image_url: Option<String>,

        /// Artist ID.
        #[arg(long)]
        artist: Option<String>,

        /// Subcategory label.
        #[arg(long)]
        subcategory: Option<String>,
    },
    /// Remove an item.
    Remove {
        /// Item ID.
        id: String,
    },
    /// Set an item's quantity; zero or less removes it.
    Update {
        /// Item ID.
        id: String,

        /// New quantity.
        #[arg(
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i64).range(..=i64::from(u32::MAX))
        )]
        quantity: i64,
    },
    /// List the cart.
    List,
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_kind(value: &str) -> Result<ItemKind, String> {
    ItemKind::from_name(value)
        .ok_or_else(|| format!("unknown item kind '{}': expected product, gig or music", value))
}

fn parse_price(value: &str) -> Result<Decimal, String> {
    let price = Decimal::from_str(value.trim())
        .map_err(|e| format!("invalid price '{}': {}", value, e))?;
    validate_unit_price(price).map_err(|e| e.to_string())
}

/// Arguments for the buy command.
#[derive(Args)]
pub struct BuyArgs {
    /// Item ID.
    pub id: String,

    /// Display name.
    #[arg(short, long)]
    pub name: String,

    /// Unit price in major units, e.g. 1.29.
    #[arg(short, long, value_parser = parse_price)]
    pub price: Decimal,

    /// Item kind: product, gig or music.
    #[arg(short, long, default_value = "product", value_parser = parse_kind)]
    pub kind: ItemKind,

    /// Description shown at checkout.
    #[arg(short, long)]
    pub description: Option<String>,

    /// How many to buy.
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub quantity: u32,

    /// Buy as a platform administrator.
    #[arg(long)]
    pub admin: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Check out as a platform administrator.
    #[arg(long)]
    pub admin: bool,
}

/// Arguments for the donate command.
#[derive(Args)]
pub struct DonateArgs {
    /// Artist ID.
    pub artist_id: String,

    /// Artist name shown on the payment page.
    #[arg(short = 'n', long)]
    pub artist_name: String,

    /// Amount in major units, e.g. 5.00.
    #[arg(short, long)]
    pub amount: Decimal,

    /// Message to the artist.
    #[arg(short, long)]
    pub message: Option<String>,

    /// Donate as a platform administrator.
    #[arg(long)]
    pub admin: bool,
}

/// Arguments for the return command.
#[derive(Args)]
pub struct ReturnArgs {
    #[command(subcommand)]
    pub command: ReturnCommand,
}

#[derive(Subcommand)]
pub enum ReturnCommand {
    /// Payment succeeded: confirm and clear the cart.
    Success {
        /// Session ID from the return URL.
        #[arg(short, long)]
        session_id: Option<String>,
    },
    /// Payment was cancelled or declined: keep the cart.
    Failure,
    /// Resolve a full return URL.
    Url {
        /// The URL the provider redirected to.
        url: String,
    },
}

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Checkout session ID.
    pub session_id: String,
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
        /// Storefront origin used for return URLs.
        #[arg(long, default_value = "http://localhost:3000")]
        origin: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the config file in use.
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct CartCli {
        #[command(subcommand)]
        command: CartCommand,
    }

    #[derive(Parser)]
    struct BuyCli {
        #[command(flatten)]
        args: BuyArgs,
    }

    #[test]
    fn test_price_must_be_non_negative() {
        assert!(parse_price("9.99").is_ok());
        assert!(parse_price("0").is_ok());
        assert!(parse_price("-5").is_err());
        assert!(parse_price("1000000000").is_err());
        assert!(parse_price("0.0000001").is_err());
        assert!(parse_price("ten").is_err());

        let add = ["marquee", "add", "p", "-n", "Poster", "--price=-5"];
        assert!(CartCli::try_parse_from(add).is_err());
        let buy = ["marquee", "t", "-n", "Track", "--price=-1.29"];
        assert!(BuyCli::try_parse_from(buy).is_err());
    }

    #[test]
    fn test_update_quantity_range() {
        let parsed = CartCli::try_parse_from(["marquee", "update", "p", "-3"]).unwrap();
        assert!(matches!(parsed.command, CartCommand::Update { quantity: -3, .. }));

        let parsed = CartCli::try_parse_from(["marquee", "update", "p", "4294967295"]).unwrap();
        assert!(matches!(
            parsed.command,
            CartCommand::Update { quantity: 4_294_967_295, .. }
        ));

        assert!(CartCli::try_parse_from(["marquee", "update", "p", "5000000000"]).is_err());
    }

    #[test]
    fn test_buy_defaults() {
        let args = ["marquee", "t-7", "-n", "Night Drive", "-p", "1.29", "-k", "track"];
        let parsed = BuyCli::try_parse_from(args).unwrap();
        assert_eq!(parsed.args.quantity, 1);
        assert_eq!(parsed.args.kind, ItemKind::Music);
        assert_eq!(parsed.args.price, Decimal::new(129, 2));

        let none = ["marquee", "t-7", "-n", "N", "-p", "1", "-q", "0"];
        assert!(BuyCli::try_parse_from(none).is_err());
    }
}
