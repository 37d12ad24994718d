//! Subcommands

use std::{io, sync::Arc};

use ghar::{
    catalog::FixtureCatalog, fixtures::CatalogData, restaurants::Restaurant, session::ClientSession,
};
use tabled::{Table, builder::Builder, settings::Style};
use tracing::info;

use crate::config::{CliConfig, Command};

pub(crate) mod feed;
pub(crate) mod order;
pub(crate) mod orders;
pub(crate) mod search;

pub(crate) async fn run(config: CliConfig) -> anyhow::Result<()> {
    let session = build_session(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match config.command {
        Command::Feed(args) => feed::run(&session, &args, &mut out).await,
        Command::Search(args) => search::run(&session, &args, &mut out).await,
        Command::Order(args) => order::run(session, args, &mut out).await,
        Command::Orders => orders::run(&session, &mut out).await,
    }
}

fn build_session(config: &CliConfig) -> anyhow::Result<ClientSession> {
    let data = match &config.catalog.fixture {
        Some(path) => {
            info!(path = %path.display(), "loading catalog fixture");

            CatalogData::from_path(path)?
        }
        None => CatalogData::demo()?,
    };

    let catalog = FixtureCatalog::new(data, config.catalog.settings());

    Ok(ClientSession::new(Arc::new(catalog), config.list.settings()))
}

fn restaurant_table<'a>(restaurants: impl IntoIterator<Item = &'a Restaurant>) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Restaurant", "Cuisine", "Rating", "Delivery"]);

    for restaurant in restaurants {
        builder.push_record([
            restaurant.id.to_string(),
            restaurant.name.clone(),
            restaurant.cuisine_label(),
            format!("{:.1}", restaurant.rating),
            restaurant.delivery_time.clone(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table
}

#[cfg(test)]
pub(crate) fn demo_session() -> testresult::TestResult<ClientSession> {
    use std::time::Duration;

    use ghar::{catalog::FixtureCatalogSettings, listing::ListSettings};

    let catalog = FixtureCatalog::new(
        CatalogData::demo()?,
        FixtureCatalogSettings {
            latency: Duration::ZERO,
            mode: ghar::catalog::FeedMode::Cycling,
            ..FixtureCatalogSettings::default()
        },
    );

    Ok(ClientSession::new(Arc::new(catalog), ListSettings::default()))
}
