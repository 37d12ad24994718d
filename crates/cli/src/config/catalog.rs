//! Catalog & List Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

use ghar::{
    catalog::{FeedMode, FixtureCatalogSettings},
    listing::ListSettings,
};

/// Feed paging behaviour.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum FeedModeArg {
    /// Slice the fixture into pages; the last slice ends the feed.
    Paged,

    /// Repeat the fixture on every page; only the page cap ends the feed.
    Cycling,
}

impl From<FeedModeArg> for FeedMode {
    fn from(mode: FeedModeArg) -> Self {
        match mode {
            FeedModeArg::Paged => FeedMode::Paged,
            FeedModeArg::Cycling => FeedMode::Cycling,
        }
    }
}

/// Catalog fixture settings.
#[derive(Debug, Args)]
pub(crate) struct CatalogConfig {
    /// Catalog fixture file; the bundled demo catalog when omitted
    #[arg(long, env = "GHAR_FIXTURE", global = true)]
    pub fixture: Option<PathBuf>,

    /// Simulated fetch latency in milliseconds
    #[arg(long, env = "GHAR_LATENCY_MS", default_value_t = 1500, global = true)]
    pub latency_ms: u64,

    /// Restaurants per page in paged mode
    #[arg(long, env = "GHAR_PAGE_SIZE", default_value_t = 6, global = true)]
    pub page_size: usize,

    /// Feed paging behaviour
    #[arg(long, env = "GHAR_FEED_MODE", value_enum, default_value_t = FeedModeArg::Cycling, global = true)]
    pub feed_mode: FeedModeArg,
}

impl CatalogConfig {
    pub fn settings(&self) -> FixtureCatalogSettings {
        FixtureCatalogSettings {
            page_size: self.page_size,
            latency: Duration::from_millis(self.latency_ms),
            mode: self.feed_mode.into(),
        }
    }
}

/// List controller settings.
#[derive(Debug, Args)]
pub(crate) struct ListConfig {
    /// Last feed page that will be loaded
    #[arg(long, env = "GHAR_MAX_PAGES", default_value_t = 5, global = true)]
    pub max_pages: u32,

    /// Distance from the bottom, in pixels, that triggers the next page
    #[arg(long, env = "GHAR_SCROLL_THRESHOLD", default_value_t = 200, global = true)]
    pub scroll_threshold: u32,
}

impl ListConfig {
    pub fn settings(&self) -> ListSettings {
        ListSettings {
            max_pages: self.max_pages,
            scroll_threshold: self.scroll_threshold,
        }
    }
}
