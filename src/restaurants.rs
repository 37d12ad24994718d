//! Restaurants

use std::{
    borrow::Cow,
    fmt::{Display, Formatter, Result as FmtResult},
};

use serde::{Deserialize, Serialize};

use crate::{menu::Menu, search::Searchable};

/// Restaurant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip a feed page suffix (`"3-2"` -> `"3"`).
    ///
    /// Cycling feeds repeat the catalog with `id-page` identifiers; detail
    /// lookups resolve them back to the catalog entry.
    pub fn base(&self) -> RestaurantId {
        match self.0.rsplit_once('-') {
            Some((base, page)) if page.parse::<u32>().is_ok() => RestaurantId::new(base),
            _ => self.clone(),
        }
    }
}

impl Display for RestaurantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for RestaurantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A restaurant listing as shown on the feed and search screens.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    /// Restaurant identifier
    pub id: RestaurantId,

    /// Display name
    pub name: String,

    /// Cuisines served, e.g. `["Nepali", "Tibetan"]`
    pub cuisines: Vec<String>,

    /// Average rating out of five
    pub rating: f32,

    /// Delivery estimate, e.g. "25-30 min"
    pub delivery_time: String,

    /// Neighbourhood, e.g. "Thamel, Kathmandu"
    pub location: Option<String>,

    /// Longer blurb shown on the detail page
    pub description: Option<String>,
}

impl Restaurant {
    /// Create a listing with no location or description.
    pub fn new(
        id: impl Into<RestaurantId>,
        name: impl Into<String>,
        cuisines: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cuisines: cuisines.into_iter().map(Into::into).collect(),
            rating: 0.0,
            delivery_time: String::new(),
            location: None,
            description: None,
        }
    }

    /// Cuisines joined for display, e.g. "Nepali, Tibetan".
    pub fn cuisine_label(&self) -> String {
        self.cuisines.join(", ")
    }

    /// Copy of this listing whose id carries a feed page suffix.
    #[must_use]
    pub fn with_page_suffix(&self, page: u32) -> Self {
        Self {
            id: RestaurantId::new(format!("{}-{page}", self.id)),
            ..self.clone()
        }
    }
}

impl Searchable for Restaurant {
    fn search_name(&self) -> &str {
        &self.name
    }

    fn search_label(&self) -> Option<Cow<'_, str>> {
        if self.cuisines.is_empty() {
            None
        } else {
            Some(Cow::Owned(self.cuisine_label()))
        }
    }
}

/// A restaurant together with its menu, as loaded for a detail visit.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantDetail {
    /// The listing
    pub restaurant: Restaurant,

    /// The menu
    pub menu: Menu,
}
