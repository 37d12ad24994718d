//! Orders

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::orders::progress::OrderProgress;

pub mod progress;
pub mod tracker;

/// Order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier for a newly placed order.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One dish on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Dish name
    pub name: String,

    /// Units ordered
    pub quantity: u32,
}

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Being prepared or on its way
    InProgress,

    /// Handed over to the customer
    Delivered,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Order identifier
    pub id: OrderId,

    /// Name of the restaurant the order was placed with
    pub restaurant: String,

    /// Ordered dishes
    pub lines: SmallVec<[OrderLine; 4]>,

    /// Amount charged in whole rupees
    pub total: u64,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Human readable status, e.g. "Food is being prepared"
    pub status_text: String,

    /// Completion percentage as reported upstream; not guaranteed to be in `0..=100`
    pub percent: i32,

    /// Delivery estimate, e.g. "25-30 min"
    pub estimated_delivery: Option<String>,

    /// Delivery address
    pub delivery_address: String,

    /// When the order was placed, as displayed ("2:30 PM", "Yesterday")
    pub placed_at: String,
}

impl OrderRecord {
    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Delivery progress derived from [`OrderRecord::percent`].
    pub fn progress(&self) -> OrderProgress {
        match self.status {
            OrderStatus::Delivered => OrderProgress::new(100),
            OrderStatus::InProgress => OrderProgress::new(self.percent),
        }
    }

    /// Whether the order still shows on the active tab.
    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::InProgress
    }
}

/// Orders split the way the orders screen shows them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderHistory {
    /// Orders still in progress
    pub active: Vec<OrderRecord>,

    /// Delivered orders
    pub past: Vec<OrderRecord>,
}

impl OrderHistory {
    /// Split records into active and past, keeping their order.
    pub fn partition(records: impl IntoIterator<Item = OrderRecord>) -> Self {
        let (active, past) = records.into_iter().partition(OrderRecord::is_active);

        Self { active, past }
    }
}
