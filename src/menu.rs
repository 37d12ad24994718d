//! Menu

use std::{
    borrow::Cow,
    fmt::{Display, Formatter, Result as FmtResult},
};

use serde::{Deserialize, Serialize};

use crate::search::Searchable;

/// Identifier of a menu item, unique within one restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(String);

impl MenuItemId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for MenuItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A dish offered by a restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Item identifier
    pub id: MenuItemId,

    /// Display name
    pub name: String,

    /// Price in whole rupees
    pub price: u32,

    /// Short description shown under the name
    pub description: Option<String>,

    /// Grouping label, e.g. "Momo" or "Drinks"
    pub category: Option<String>,
}

impl MenuItem {
    /// Create an uncategorised item with no description.
    pub fn new(id: impl Into<MenuItemId>, name: impl Into<String>, price: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: None,
            category: None,
        }
    }

    /// Set the item's category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl Searchable for MenuItem {
    fn search_name(&self) -> &str {
        &self.name
    }

    fn search_label(&self) -> Option<Cow<'_, str>> {
        self.category.as_deref().map(Cow::Borrowed)
    }
}

/// A restaurant's menu in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Create a menu from items in display order.
    pub fn new(items: impl Into<Vec<MenuItem>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Look up an item by id.
    pub fn get(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Iterate over items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter()
    }

    /// Items as a slice.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Number of items on the menu.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the menu has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Group items by category.
    ///
    /// Groups appear in the order their category is first seen; uncategorised
    /// items form a group keyed by `None`.
    pub fn grouped(&self) -> Vec<(Option<&str>, Vec<&MenuItem>)> {
        let mut groups: Vec<(Option<&str>, Vec<&MenuItem>)> = Vec::new();

        for item in &self.items {
            let category = item.category.as_deref();

            match groups.iter_mut().find(|(key, _)| *key == category) {
                Some((_, members)) => members.push(item),
                None => groups.push((category, vec![item])),
            }
        }

        groups
    }

    pub(crate) fn into_items(self) -> Vec<MenuItem> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Menu {
    type Item = &'a MenuItem;
    type IntoIter = std::slice::Iter<'a, MenuItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
