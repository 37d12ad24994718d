//! Receipt
//!
//! Terminal rendering of a cart: one row per line and a summary footer in the
//! same shape as the checkout button ("3 items | Rs. 790").

use std::io;

use rusty_money::{
    Formatter, Money, Params, Position,
    iso::{self, Currency},
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::cart::{Cart, CartLine};

/// Errors that can occur while writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Whole-rupee amount as money.
pub fn rupees(amount: u64) -> Money<'static, Currency> {
    Money::from_major(i64::try_from(amount).unwrap_or(i64::MAX), iso::NPR)
}

const PRICE_POSITIONS: &[Position] = &[
    Position::Sign,
    Position::Symbol,
    Position::Space,
    Position::Amount,
];

/// Format money the way the app prints prices, e.g. "Rs. 220".
///
/// Prices are whole rupees, so no minor units or digit grouping are shown.
pub fn format_money(money: &Money<'_, Currency>) -> String {
    Formatter::money(
        money,
        Params {
            separator_pattern: &[],
            positions: PRICE_POSITIONS,
            rounding: Some(0),
            symbol: Some("Rs."),
            ..Params::default()
        },
    )
}

/// Format a whole-rupee amount, e.g. "Rs. 220".
pub fn format_rupees(amount: u64) -> String {
    format_money(&rupees(amount))
}

/// A printable snapshot of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    rows: Vec<SummaryRow>,
    total_items: u64,
    total: Money<'static, Currency>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SummaryRow {
    name: String,
    quantity: u32,
    unit_price: Money<'static, Currency>,
    line_total: Money<'static, Currency>,
}

impl From<&CartLine> for SummaryRow {
    fn from(line: &CartLine) -> Self {
        Self {
            name: line.name().to_string(),
            quantity: line.quantity(),
            unit_price: rupees(u64::from(line.unit_price())),
            line_total: rupees(line.line_total()),
        }
    }
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        Self {
            rows: cart.lines().iter().map(SummaryRow::from).collect(),
            total_items: cart.total_items(),
            total: cart.total_money(),
        }
    }
}

impl CartSummary {
    /// Footer text, e.g. "3 items | Rs. 790".
    pub fn headline(&self) -> String {
        let noun = if self.total_items == 1 { "item" } else { "items" };

        format!(
            "{} {noun} | {}",
            self.total_items,
            format_money(&self.total)
        )
    }

    /// Check if the summarised cart was empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the summary table followed by the headline.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.is_empty() {
            writeln!(out, "Your cart is empty")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Price", "Total"]);

        for row in &self.rows {
            builder.push_record([
                row.name.clone(),
                row.quantity.to_string(),
                format_money(&row.unit_price),
                format_money(&row.line_total),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..4), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{table}")?;
        writeln!(out, " {}", self.headline())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::menu::MenuItem;

    use super::*;

    #[test]
    fn rupees_uses_major_units() {
        assert_eq!(rupees(220), Money::from_major(220, iso::NPR));
    }

    #[test]
    fn prices_print_as_whole_rupees() {
        assert_eq!(format_rupees(220), "Rs. 220");
        assert_eq!(format_rupees(0), "Rs. 0");
        assert_eq!(format_rupees(12_500), "Rs. 12500");
        assert_eq!(format_money(&Money::from_major(790, iso::NPR)), "Rs. 790");
    }

    #[test]
    fn headline_matches_checkout_button() {
        let mut cart = Cart::new();
        cart.add_item(&MenuItem::new("m1", "Chicken Momo", 220));
        cart.add_item(&MenuItem::new("m1", "Chicken Momo", 220));
        cart.add_item(&MenuItem::new("m2", "Veg Thali Set", 350));

        let summary = CartSummary::from(&cart);

        assert_eq!(summary.headline(), "3 items | Rs. 790");
    }

    #[test]
    fn headline_uses_singular_for_one_item() {
        let mut cart = Cart::new();
        cart.add_item(&MenuItem::new("m4", "Chicken Chowmein", 240));

        assert_eq!(CartSummary::from(&cart).headline(), "1 item | Rs. 240");
    }

    #[test]
    fn write_to_renders_every_line() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&MenuItem::new("m1", "Chicken Momo", 220));
        cart.add_item(&MenuItem::new("m3", "Butter Chicken", 380));

        let mut out = Vec::new();
        CartSummary::from(&cart).write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Chicken Momo"), "missing first line: {output}");
        assert!(output.contains("Butter Chicken"), "missing second line: {output}");
        assert!(output.contains("Rs. 380"), "missing price: {output}");
        assert!(output.contains("2 items | Rs. 600"), "missing headline: {output}");

        Ok(())
    }

    #[test]
    fn write_to_reports_empty_cart() -> TestResult {
        let mut out = Vec::new();
        CartSummary::from(&Cart::new()).write_to(&mut out)?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty\n");

        Ok(())
    }
}
