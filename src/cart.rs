//! Cart
//!
//! The cart held by a single restaurant-detail visit. Lines are keyed by menu
//! item id, and a line with zero quantity never exists: removing the last unit
//! deletes the line.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::NonZeroU32,
};

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    menu::{MenuItem, MenuItemId},
    receipt::rupees,
};

/// One selected menu item and how many of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    item_id: MenuItemId,
    name: String,
    unit_price: u32,
    quantity: NonZeroU32,
}

impl CartLine {
    fn new(item: &MenuItem) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Id of the menu item this line holds.
    pub fn item_id(&self) -> &MenuItemId {
        &self.item_id
    }

    /// Item name captured when the line was created.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price captured when the line was created.
    pub fn unit_price(&self) -> u32 {
        self.unit_price
    }

    /// Number of units, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// `quantity × unit_price`.
    pub fn line_total(&self) -> u64 {
        u64::from(self.quantity.get()) * u64::from(self.unit_price)
    }
}

/// UI feedback emitted by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotice {
    /// An item was added through [`Cart::add_item`].
    ItemAdded {
        /// Id of the added item
        item_id: MenuItemId,

        /// Name of the added item
        name: String,
    },
}

impl CartNotice {
    /// Short toast heading.
    pub fn title(&self) -> &'static str {
        match self {
            CartNotice::ItemAdded { .. } => "Added to cart",
        }
    }

    /// Toast body text.
    pub fn description(&self) -> String {
        match self {
            CartNotice::ItemAdded { name, .. } => format!("{name} has been added to your cart"),
        }
    }
}

impl Display for CartNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.title(), self.description())
    }
}

/// Cart
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: SmallVec<[CartLine; 8]>,
    notices: Vec<CartNotice>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`.
    ///
    /// Bumps the existing line for the item, or starts a new line capturing the
    /// item's current name and price. Queues a [`CartNotice::ItemAdded`].
    pub fn add_item(&mut self, item: &MenuItem) {
        match self.line_mut(&item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(item)),
        }

        debug!(item = %item.id, quantity = self.quantity_of(&item.id), "item added to cart");

        self.notices.push(CartNotice::ItemAdded {
            item_id: item.id.clone(),
            name: item.name.clone(),
        });
    }

    /// Add one unit to an existing line without emitting a notice.
    ///
    /// Returns `false` when the item has no line yet.
    pub fn increment(&mut self, item_id: &MenuItemId) -> bool {
        let Some(line) = self.line_mut(item_id) else {
            return false;
        };

        line.quantity = line.quantity.saturating_add(1);

        true
    }

    /// Remove one unit of the item, deleting its line when the last unit goes.
    ///
    /// Removing an item that is not in the cart does nothing.
    pub fn remove_item(&mut self, item_id: &MenuItemId) {
        let Some(index) = self.lines.iter().position(|line| &line.item_id == item_id) else {
            return;
        };

        let remaining = self
            .lines
            .get(index)
            .and_then(|line| NonZeroU32::new(line.quantity.get() - 1));

        match (remaining, self.lines.get_mut(index)) {
            (Some(quantity), Some(line)) => line.quantity = quantity,
            _ => {
                self.lines.remove(index);
            }
        }

        debug!(item = %item_id, quantity = self.quantity_of(item_id), "item removed from cart");
    }

    /// Units of the item in the cart, zero when absent.
    pub fn quantity_of(&self, item_id: &MenuItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| &line.item_id == item_id)
            .map_or(0, CartLine::quantity)
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Sum of `quantity × unit_price` over all lines.
    pub fn total_amount(&self) -> u64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// [`Cart::total_amount`] as money for display.
    pub fn total_money(&self) -> Money<'static, Currency> {
        rupees(self.total_amount())
    }

    /// Lines in the order items were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every line and any undelivered notices.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.notices.clear();
    }

    /// Drain notices queued since the last call.
    pub fn take_notices(&mut self) -> Vec<CartNotice> {
        std::mem::take(&mut self.notices)
    }

    fn line_mut(&mut self, item_id: &MenuItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.item_id == item_id)
    }
}
