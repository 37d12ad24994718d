use std::io::Write;

use ghar::{orders::OrderRecord, receipt::format_rupees, session::ClientSession};

pub(crate) async fn run(session: &ClientSession, out: &mut impl Write) -> anyhow::Result<()> {
    let history = session.order_history().await?;

    writeln!(out, "Active orders")?;

    if history.active.is_empty() {
        writeln!(out, " No active orders")?;
    }

    for order in &history.active {
        let progress = order.progress();

        writeln!(out)?;
        writeln!(out, " {} ({})", order.restaurant, order.id)?;
        writeln!(out, "  {}: {}%", order.status_text, progress.bar_percent())?;

        if let Some(estimate) = &order.estimated_delivery {
            writeln!(out, "  Estimated delivery: {estimate}")?;
        }

        for stage in progress.stages() {
            writeln!(out, "   {stage}")?;
        }

        write_lines(out, order)?;
    }

    writeln!(out)?;
    writeln!(out, "Past orders")?;

    if history.past.is_empty() {
        writeln!(out, " No past orders")?;
    }

    for order in &history.past {
        writeln!(out)?;
        writeln!(out, " {} | {}", order.restaurant, order.placed_at)?;
        write_lines(out, order)?;
    }

    Ok(())
}

fn write_lines(out: &mut impl Write, order: &OrderRecord) -> std::io::Result<()> {
    let items = order
        .lines
        .iter()
        .map(|line| format!("{}x {}", line.quantity, line.name))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(out, "  {items}")?;
    writeln!(out, "  Total: {}", format_rupees(order.total))
}
