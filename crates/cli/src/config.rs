//! CLI configuration

use clap::{Parser, Subcommand};

use crate::commands::{feed::FeedArgs, order::OrderArgs, search::SearchArgs};

pub(crate) mod catalog;
pub(crate) mod logging;

use catalog::{CatalogConfig, ListConfig};
use logging::LoggingConfig;

/// Ghar CLI configuration
#[derive(Debug, Parser)]
#[command(name = "ghar", about = "Browse restaurants and place orders against a catalog fixture", long_about = None)]
pub(crate) struct CliConfig {
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(flatten)]
    pub catalog: CatalogConfig,

    #[command(flatten)]
    pub list: ListConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Scroll through the restaurant feed
    Feed(FeedArgs),

    /// Search restaurants by name or cuisine
    Search(SearchArgs),

    /// Build a cart at one restaurant and check out
    Order(OrderArgs),

    /// Show active and past orders
    Orders,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
