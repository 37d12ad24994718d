use std::io::Write;

use anyhow::bail;
use clap::Args;

use ghar::{listing::LoadOutcome, session::ClientSession};

use super::restaurant_table;

const POPULAR_SEARCHES: [&str; 8] = [
    "Momo", "Thali", "Pizza", "Biryani", "Burger", "Chowmein", "Nepali", "Indian",
];

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Text to match against restaurant names and cuisines
    pub query: String,
}

pub(crate) async fn run(
    session: &ClientSession,
    args: &SearchArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut list = session.restaurant_list();

    match list.search(&args.query).await {
        LoadOutcome::Failed(error) => bail!(error),
        LoadOutcome::Cleared => {
            writeln!(out, "Popular searches")?;
            writeln!(out, " {}", POPULAR_SEARCHES.join(" | "))?;

            return Ok(());
        }
        LoadOutcome::Loaded { .. } | LoadOutcome::Stale => {}
    }

    if list.entries().is_empty() {
        writeln!(out, "No restaurants found")?;
        writeln!(out, " Try searching for something else")?;

        return Ok(());
    }

    writeln!(out, "{}", restaurant_table(list.entries()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::commands::demo_session;

    use super::*;

    async fn search(query: &str) -> TestResult<String> {
        let session = demo_session()?;
        let mut out = Vec::new();

        run(
            &session,
            &SearchArgs {
                query: query.to_string(),
            },
            &mut out,
        )
        .await?;

        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn lists_matches() -> TestResult {
        let printed = search("chinese").await?;

        assert!(printed.contains("Momo House"));
        assert!(!printed.contains("Thakali Kitchen"));

        Ok(())
    }

    #[tokio::test]
    async fn reports_no_matches() -> TestResult {
        assert!(search("pizza").await?.contains("No restaurants found"));

        Ok(())
    }

    #[tokio::test]
    async fn blank_query_suggests_popular_searches() -> TestResult {
        let printed = search("  ").await?;

        assert!(printed.contains("Popular searches"));
        assert!(printed.contains("Momo | Thali | Pizza"));
        assert!(!printed.contains("No restaurants found"));

        Ok(())
    }
}
