use std::io::Write;

use anyhow::{Context, bail};
use clap::Args;
use tracing::warn;

use ghar::{
    menu::{Menu, MenuItemId},
    receipt::{CartSummary, format_rupees},
    restaurants::RestaurantId,
    session::{ClientSession, Resolution},
};

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    /// Restaurant id, e.g. `1` or a feed id such as `1-3`
    pub restaurant: String,

    /// Menu item to add, once per unit
    #[arg(long)]
    pub add: Vec<String>,

    /// Item already in the cart to add one more unit of, once per unit
    #[arg(long)]
    pub more: Vec<String>,

    /// Menu item to remove, once per unit
    #[arg(long)]
    pub remove: Vec<String>,

    /// Where to deliver
    #[arg(long, env = "GHAR_DELIVERY_ADDRESS", default_value = "Thapathali, Kathmandu")]
    pub address: String,
}

pub(crate) async fn run(
    mut session: ClientSession,
    args: OrderArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (visit, resolution) = session
        .visit_restaurant(RestaurantId::new(args.restaurant))
        .await;

    let details = session.details_mut();

    if resolution == Resolution::Failed {
        let error = details
            .get(visit)
            .and_then(|visit| visit.error().cloned())
            .context("restaurant visit closed")?;

        bail!(error);
    }

    let detail = details
        .get(visit)
        .and_then(|visit| visit.detail())
        .context("restaurant details did not load")?;

    writeln!(out, "{}", detail.restaurant.name)?;
    writeln!(
        out,
        " {} | ★ {:.1} | {}",
        detail.restaurant.cuisine_label(),
        detail.restaurant.rating,
        detail.restaurant.delivery_time
    )?;
    write_menu(out, &detail.menu)?;

    for id in &args.add {
        if !details.add_to_cart(visit, &MenuItemId::new(id.as_str())) {
            warn!(item = %id, "menu item not found");
            bail!("no menu item {id}");
        }
    }

    let cart = details.cart_mut(visit).context("restaurant visit closed")?;

    for id in &args.more {
        if !cart.increment(&MenuItemId::new(id.as_str())) {
            bail!("{id} is not in the cart");
        }
    }

    for id in &args.remove {
        cart.remove_item(&MenuItemId::new(id.as_str()));
    }

    for notice in cart.take_notices() {
        writeln!(out, "✓ {notice}")?;
    }

    let summary = CartSummary::from(&*cart);

    writeln!(out)?;
    summary.write_to(&mut *out)?;

    if summary.is_empty() {
        return Ok(());
    }

    let order = details.checkout(visit, args.address)?;

    writeln!(out)?;
    writeln!(out, "Order {} placed with {}", order.id, order.restaurant)?;

    if let Some(estimate) = &order.estimated_delivery {
        writeln!(out, " Estimated delivery: {estimate}")?;
    }

    for stage in order.progress().stages() {
        writeln!(out, "  {stage}")?;
    }

    details.close(visit);

    Ok(())
}

fn write_menu(out: &mut impl Write, menu: &Menu) -> std::io::Result<()> {
    if menu.is_empty() {
        return writeln!(out, "\n No menu available");
    }

    for (category, items) in menu.grouped() {
        writeln!(out, "\n {}", category.unwrap_or("Other"))?;

        for item in items {
            writeln!(
                out,
                "  {:<6} {:<24} {:>10}",
                item.id.as_str(),
                item.name,
                format_rupees(u64::from(item.price))
            )?;
        }
    }

    writeln!(out)
}
