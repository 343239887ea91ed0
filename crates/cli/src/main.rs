//! Brewline CLI - database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! brew-cli migrate
//!
//! # List the menu, optionally one category
//! brew-cli menu --category coffee
//!
//! # Price a line: Grande americano with an extra shot, two cups
//! brew-cli quote --item 1 --size grande --temperature iced --extra shot --quantity 2
//!
//! # Same, with 3,000 points and the welcome coupon for customer 1
//! brew-cli quote --item 1 --size grande --quantity 2 --points 3000 --coupon 1
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use brewline_core::cart::Selection;
use brewline_core::{CouponId, MenuItemId, UserId};
use clap::{Parser, Subcommand};

mod commands;

use commands::quote::QuoteRequest;

#[derive(Parser)]
#[command(name = "brew-cli")]
#[command(author, version, about = "Brewline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// List menu items with prices and options
    Menu {
        /// Category code (`coffee`, `non_coffee`, `dessert`)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Price a menu item with options
    Quote {
        /// Menu item id
        #[arg(short, long)]
        item: u32,

        /// Size option id (e.g. `tall`, `grande`, `venti`)
        #[arg(short, long)]
        size: Option<String>,

        /// Temperature option id (`hot`, `iced`)
        #[arg(short, long)]
        temperature: Option<String>,

        /// Extra option id; repeat for several
        #[arg(short, long = "extra")]
        extras: Vec<String>,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Points to spend
        #[arg(long)]
        points: Option<u32>,

        /// Coupon id to apply
        #[arg(long)]
        coupon: Option<u32>,

        /// Customer whose balance and coupons apply
        #[arg(long, default_value_t = 1)]
        user: u32,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Menu { category } => commands::menu::list(category.as_deref())?,
        Commands::Quote {
            item,
            size,
            temperature,
            extras,
            quantity,
            points,
            coupon,
            user,
        } => commands::quote::run(QuoteRequest {
            item: MenuItemId::new(item),
            selection: Selection {
                size,
                temperature,
                extras,
            },
            quantity,
            user: UserId::new(user),
            points,
            coupon: coupon.map(CouponId::new),
        })?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_quote_collects_repeated_extras() {
        let cli = Cli::try_parse_from([
            "brew-cli", "quote", "--item", "1", "--extra", "shot", "--extra", "vanilla",
        ])
        .map_err(|e| e.to_string());
        match cli.map(|cli| cli.command) {
            Ok(Commands::Quote {
                item,
                extras,
                quantity,
                size,
                ..
            }) => {
                assert_eq!(item, 1);
                assert_eq!(extras, ["shot", "vanilla"]);
                assert_eq!(quantity, 1);
                assert_eq!(size, None);
            }
            _ => panic!("expected quote command"),
        }
    }

    #[test]
    fn test_menu_category_is_optional() {
        assert!(matches!(
            Cli::try_parse_from(["brew-cli", "menu"]).map(|cli| cli.command),
            Ok(Commands::Menu { category: None })
        ));
    }
}
