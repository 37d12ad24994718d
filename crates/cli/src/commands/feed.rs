use std::{io::Write, time::Instant};

use anyhow::bail;
use clap::Args;
use humanize_duration::{Truncate, prelude::DurationExt};

use ghar::{
    listing::{LoadOutcome, ScrollSignal},
    session::ClientSession,
};

use super::restaurant_table;

#[derive(Debug, Args)]
pub(crate) struct FeedArgs {
    /// Stop after this many pages even if the feed has more
    #[arg(long)]
    pub pages: Option<u32>,
}

pub(crate) async fn run(
    session: &ClientSession,
    args: &FeedArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut feed = session.restaurant_list();
    let limit = args.pages.unwrap_or(u32::MAX).max(1);

    let start = Instant::now();

    if let LoadOutcome::Failed(error) = feed.load_initial().await {
        bail!(error);
    }

    // Every loaded page is assumed to leave the end of the list on screen.
    while feed.state().page() < limit {
        match feed.on_scroll(ScrollSignal::Intersecting(true)).await {
            None => break,
            Some(LoadOutcome::Failed(error)) => bail!(error),
            Some(_) => {}
        }
    }

    let elapsed = start.elapsed();

    if feed.entries().is_empty() {
        writeln!(out, "No restaurants available")?;

        return Ok(());
    }

    writeln!(out, "{}", restaurant_table(feed.entries()))?;
    writeln!(
        out,
        " {} restaurants across {} pages{} ({})",
        feed.entries().len(),
        feed.state().page(),
        if feed.state().has_more() {
            ", more available"
        } else {
            ""
        },
        elapsed.human(Truncate::Nano)
    )?;

    Ok(())
}
