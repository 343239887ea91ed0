//! Command implementations.

pub mod menu;
pub mod migrate;
pub mod quote;

use thiserror::Error;

/// Errors from any command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Argument names something the catalog does not have.
    #[error("{0}")]
    InvalidArgument(String),

    /// The items cannot be added to a cart as given.
    #[error("Cart error: {0}")]
    Cart(#[from] brewline_core::cart::CartError),

    /// Points or coupon were rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] brewline_core::checkout::CheckoutError),
}
