//! Fixtures
//!
//! YAML catalog fixtures: restaurants, their menus, and order history.

use std::{fs, path::Path};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    menu::{Menu, MenuItem, MenuItemId},
    orders::{OrderId, OrderLine, OrderRecord, OrderStatus},
    restaurants::{Restaurant, RestaurantId},
};

const DEMO_FIXTURE_YAML: &str = include_str!("../fixtures/catalog/demo.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Menu item priced at zero
    #[error("Menu item {item} of restaurant {restaurant} must have a positive price")]
    InvalidPrice {
        /// Restaurant owning the menu
        restaurant: String,

        /// Offending item
        item: String,
    },

    /// Two restaurants share an id
    #[error("Duplicate restaurant id: {0}")]
    DuplicateRestaurant(String),

    /// Two items on one menu share an id
    #[error("Duplicate menu item {item} in menu of restaurant {restaurant}")]
    DuplicateMenuItem {
        /// Restaurant owning the menu
        restaurant: String,

        /// Duplicated item id
        item: String,
    },

    /// A menu references a restaurant that is not in the fixture
    #[error("Menu references unknown restaurant: {0}")]
    UnknownRestaurant(String),
}

/// Wrapper for the catalog in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    #[serde(default)]
    restaurants: Vec<RestaurantFixture>,

    #[serde(default)]
    menus: FxHashMap<String, Vec<MenuItemFixture>>,

    #[serde(default)]
    orders: Vec<OrderFixture>,
}

/// Cuisine as a joined string (`"Nepali, Tibetan"`) or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CuisineFixture {
    Joined(String),
    List(Vec<String>),
}

impl CuisineFixture {
    fn into_cuisines(self) -> Vec<String> {
        let raw = match self {
            CuisineFixture::Joined(joined) => joined
                .split(',')
                .map(str::to_string)
                .collect::<Vec<_>>(),
            CuisineFixture::List(list) => list,
        };

        raw.into_iter()
            .map(|cuisine| cuisine.trim().to_string())
            .filter(|cuisine| !cuisine.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RestaurantFixture {
    id: String,
    name: String,
    #[serde(alias = "cuisines")]
    cuisine: Option<CuisineFixture>,
    #[serde(default)]
    rating: f32,
    #[serde(default)]
    delivery_time: String,
    location: Option<String>,
    description: Option<String>,
}

impl From<RestaurantFixture> for Restaurant {
    fn from(fixture: RestaurantFixture) -> Self {
        Restaurant {
            id: RestaurantId::new(fixture.id),
            name: fixture.name,
            cuisines: fixture
                .cuisine
                .map(CuisineFixture::into_cuisines)
                .unwrap_or_default(),
            rating: fixture.rating,
            delivery_time: fixture.delivery_time,
            location: fixture.location,
            description: fixture.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MenuItemFixture {
    id: String,
    name: String,
    price: u32,
    description: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderLineFixture {
    name: String,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct OrderFixture {
    id: String,
    restaurant: String,
    items: Vec<OrderLineFixture>,
    total: u64,
    status: OrderStatus,
    #[serde(default)]
    status_text: String,
    #[serde(default)]
    progress: i32,
    estimated_delivery: Option<String>,
    #[serde(default)]
    delivery_address: String,
    #[serde(default)]
    placed_at: String,
}

impl From<OrderFixture> for OrderRecord {
    fn from(fixture: OrderFixture) -> Self {
        OrderRecord {
            id: OrderId::new(fixture.id),
            restaurant: fixture.restaurant,
            lines: fixture
                .items
                .into_iter()
                .map(|line| OrderLine {
                    name: line.name,
                    quantity: line.quantity,
                })
                .collect::<SmallVec<_>>(),
            total: fixture.total,
            status: fixture.status,
            status_text: fixture.status_text,
            percent: fixture.progress,
            estimated_delivery: fixture.estimated_delivery,
            delivery_address: fixture.delivery_address,
            placed_at: fixture.placed_at,
        }
    }
}

/// Restaurants, menus and orders loaded from a fixture.
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    /// Restaurants in feed order
    pub restaurants: Vec<Restaurant>,

    /// Menus keyed by restaurant
    pub menus: FxHashMap<RestaurantId, Menu>,

    /// Order history, newest first
    pub orders: Vec<OrderRecord>,
}

impl CatalogData {
    /// The bundled demo catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled fixture fails validation.
    pub fn demo() -> Result<Self, FixtureError> {
        Self::from_yaml(DEMO_FIXTURE_YAML)
    }

    /// Load a catalog fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a restaurant id repeats, a
    /// menu repeats an item id or prices an item at zero, or a menu names a
    /// restaurant missing from the fixture.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let mut seen = FxHashSet::default();
        let mut restaurants = Vec::with_capacity(fixture.restaurants.len());

        for restaurant in fixture.restaurants {
            if !seen.insert(restaurant.id.clone()) {
                return Err(FixtureError::DuplicateRestaurant(restaurant.id));
            }

            restaurants.push(Restaurant::from(restaurant));
        }

        let mut menus = FxHashMap::default();

        for (restaurant, items) in fixture.menus {
            if !seen.contains(&restaurant) {
                return Err(FixtureError::UnknownRestaurant(restaurant));
            }

            let menu = parse_menu(&restaurant, items)?;

            menus.insert(RestaurantId::new(restaurant), menu);
        }

        Ok(Self {
            restaurants,
            menus,
            orders: fixture.orders.into_iter().map(OrderRecord::from).collect(),
        })
    }
}

fn parse_menu(restaurant: &str, items: Vec<MenuItemFixture>) -> Result<Menu, FixtureError> {
    let mut ids = FxHashSet::default();
    let mut parsed = Vec::with_capacity(items.len());

    for item in items {
        if item.price == 0 {
            return Err(FixtureError::InvalidPrice {
                restaurant: restaurant.to_string(),
                item: item.id,
            });
        }

        if !ids.insert(item.id.clone()) {
            return Err(FixtureError::DuplicateMenuItem {
                restaurant: restaurant.to_string(),
                item: item.id,
            });
        }

        parsed.push(MenuItem {
            id: MenuItemId::new(item.id),
            name: item.name,
            price: item.price,
            description: item.description,
            category: item.category,
        });
    }

    Ok(Menu::new(parsed))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn demo_fixture_loads() -> TestResult {
        let data = CatalogData::demo()?;

        assert_eq!(data.restaurants.len(), 6);
        assert_eq!(data.orders.len(), 3);

        let menu = data
            .menus
            .get(&RestaurantId::from("1"))
            .ok_or("missing menu")?;

        assert_eq!(menu.len(), 4);

        Ok(())
    }

    #[test]
    fn cuisine_string_and_list_normalise_the_same() -> TestResult {
        let data = CatalogData::from_yaml(
            r#"
restaurants:
  - id: a
    name: Joined
    cuisine: "Nepali,  Tibetan , "
  - id: b
    name: Listed
    cuisines: [Nepali, Tibetan]
"#,
        )?;

        for restaurant in &data.restaurants {
            assert_eq!(restaurant.cuisines, ["Nepali", "Tibetan"]);
        }

        assert_eq!(data.restaurants.len(), 2);

        Ok(())
    }

    #[test]
    fn order_status_parses_kebab_case() -> TestResult {
        let data = CatalogData::demo()?;

        let statuses: Vec<OrderStatus> = data.orders.iter().map(|order| order.status).collect();

        assert_eq!(
            statuses,
            [
                OrderStatus::InProgress,
                OrderStatus::Delivered,
                OrderStatus::Delivered
            ]
        );

        Ok(())
    }

    #[test]
    fn rejects_duplicate_restaurant_ids() {
        let result = CatalogData::from_yaml(
            r"
restaurants:
  - { id: a, name: One }
  - { id: a, name: Two }
",
        );

        assert!(matches!(result, Err(FixtureError::DuplicateRestaurant(id)) if id == "a"));
    }

    #[test]
    fn rejects_zero_priced_items() {
        let result = CatalogData::from_yaml(
            r"
restaurants:
  - { id: a, name: One }
menus:
  a:
    - { id: m1, name: Free Lunch, price: 0 }
",
        );

        assert!(matches!(result, Err(FixtureError::InvalidPrice { item, .. }) if item == "m1"));
    }

    #[test]
    fn rejects_duplicate_menu_items() {
        let result = CatalogData::from_yaml(
            r"
restaurants:
  - { id: a, name: One }
menus:
  a:
    - { id: m1, name: Momo, price: 100 }
    - { id: m1, name: Momo Again, price: 120 }
",
        );

        assert!(matches!(result, Err(FixtureError::DuplicateMenuItem { item, .. }) if item == "m1"));
    }

    #[test]
    fn rejects_menus_for_unknown_restaurants() {
        let result = CatalogData::from_yaml(
            r"
menus:
  ghost:
    - { id: m1, name: Momo, price: 100 }
",
        );

        assert!(matches!(result, Err(FixtureError::UnknownRestaurant(id)) if id == "ghost"));
    }

    #[test]
    fn from_path_reads_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "restaurants:\n  - {{ id: x, name: Test Kitchen }}")?;

        let data = CatalogData::from_path(file.path())?;

        assert_eq!(data.restaurants.len(), 1);

        Ok(())
    }

    #[test]
    fn from_path_reports_missing_file() {
        let result = CatalogData::from_path("./does/not/exist.yml");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
