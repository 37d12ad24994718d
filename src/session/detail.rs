//! Restaurant detail visits
//!
//! Each visit to a restaurant page owns a fresh [`Cart`]. Visits live in a
//! slot map, so a detail fetch that lands after its visit was closed finds a
//! dead key and is dropped.

use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::Cart,
    catalog::CatalogError,
    menu::{Menu, MenuItemId},
    orders::{OrderId, OrderLine, OrderRecord, OrderStatus},
    restaurants::{RestaurantDetail, RestaurantId},
};

new_key_type! {
    /// Detail Visit Key
    pub struct DetailKey;
}

/// Checkout failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The visit was closed or never existed
    #[error("restaurant visit is no longer open")]
    UnknownSession,

    /// The restaurant detail has not arrived yet
    #[error("restaurant details are still loading")]
    NotLoaded,

    /// Nothing to order
    #[error("your cart is empty")]
    EmptyCart,
}

/// What happened to a detail fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The detail was stored on the visit
    Applied,

    /// The fetch failed; the error was stored on the visit
    Failed,

    /// The visit had already been closed
    Discarded,
}

/// One restaurant page visit.
#[derive(Debug, Clone)]
pub struct DetailVisit {
    restaurant: RestaurantId,
    detail: Option<RestaurantDetail>,
    error: Option<CatalogError>,
    cart: Cart,
}

impl DetailVisit {
    fn new(restaurant: RestaurantId) -> Self {
        Self {
            restaurant,
            detail: None,
            error: None,
            cart: Cart::new(),
        }
    }

    /// Restaurant being visited.
    pub fn restaurant_id(&self) -> &RestaurantId {
        &self.restaurant
    }

    /// The loaded detail, if it has arrived.
    pub fn detail(&self) -> Option<&RestaurantDetail> {
        self.detail.as_ref()
    }

    /// The loaded menu, if any.
    pub fn menu(&self) -> Option<&Menu> {
        self.detail.as_ref().map(|detail| &detail.menu)
    }

    /// Error from the detail fetch.
    pub fn error(&self) -> Option<&CatalogError> {
        self.error.as_ref()
    }

    /// Whether the detail is still loading.
    pub fn is_loading(&self) -> bool {
        self.detail.is_none() && self.error.is_none()
    }

    /// The visit's cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }
}

/// Open restaurant detail visits.
#[derive(Debug, Clone, Default)]
pub struct DetailSessions {
    visits: SlotMap<DetailKey, DetailVisit>,
}

impl DetailSessions {
    /// No open visits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a visit with an empty cart; the detail is still to be resolved.
    pub fn open(&mut self, restaurant: RestaurantId) -> DetailKey {
        debug!(restaurant = %restaurant, "restaurant visit opened");

        self.visits.insert(DetailVisit::new(restaurant))
    }

    /// Store the detail fetch result on its visit.
    pub fn resolve(
        &mut self,
        key: DetailKey,
        result: Result<RestaurantDetail, CatalogError>,
    ) -> Resolution {
        let Some(visit) = self.visits.get_mut(key) else {
            debug!("detail arrived for a closed visit, discarding");

            return Resolution::Discarded;
        };

        match result {
            Ok(detail) => {
                visit.detail = Some(detail);
                visit.error = None;

                Resolution::Applied
            }
            Err(error) => {
                visit.error = Some(error);

                Resolution::Failed
            }
        }
    }

    /// Close a visit, dropping its cart.
    pub fn close(&mut self, key: DetailKey) -> bool {
        self.visits.remove(key).is_some()
    }

    /// Look up an open visit.
    pub fn get(&self, key: DetailKey) -> Option<&DetailVisit> {
        self.visits.get(key)
    }

    /// Mutable cart of an open visit.
    pub fn cart_mut(&mut self, key: DetailKey) -> Option<&mut Cart> {
        self.visits.get_mut(key).map(|visit| &mut visit.cart)
    }

    /// Add one unit of a menu item to the visit's cart.
    ///
    /// Returns `false` if the visit is closed, not loaded, or the menu has no
    /// such item.
    pub fn add_to_cart(&mut self, key: DetailKey, item_id: &MenuItemId) -> bool {
        let Some(visit) = self.visits.get_mut(key) else {
            return false;
        };

        let Some(item) = visit.detail.as_ref().and_then(|detail| detail.menu.get(item_id)) else {
            return false;
        };

        visit.cart.add_item(item);

        true
    }

    /// Remove one unit of an item from the visit's cart.
    pub fn remove_from_cart(&mut self, key: DetailKey, item_id: &MenuItemId) {
        if let Some(cart) = self.cart_mut(key) {
            cart.remove_item(item_id);
        }
    }

    /// Number of open visits.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Whether no visit is open.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Place an order from the visit's cart and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] when the visit is closed, its detail has not
    /// loaded, or its cart is empty.
    pub fn checkout(
        &mut self,
        key: DetailKey,
        delivery_address: impl Into<String>,
    ) -> Result<OrderRecord, CheckoutError> {
        let visit = self
            .visits
            .get_mut(key)
            .ok_or(CheckoutError::UnknownSession)?;

        let detail = visit.detail.as_ref().ok_or(CheckoutError::NotLoaded)?;

        if visit.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let restaurant = &detail.restaurant;

        let order = OrderRecord {
            id: OrderId::generate(),
            restaurant: restaurant.name.clone(),
            lines: visit
                .cart
                .lines()
                .iter()
                .map(|line| OrderLine {
                    name: line.name().to_string(),
                    quantity: line.quantity(),
                })
                .collect(),
            total: visit.cart.total_amount(),
            status: OrderStatus::InProgress,
            status_text: "Order confirmed".to_string(),
            percent: 0,
            estimated_delivery: Some(restaurant.delivery_time.clone())
                .filter(|estimate| !estimate.is_empty()),
            delivery_address: delivery_address.into(),
            placed_at: "Just now".to_string(),
        };

        visit.cart.clear();

        info!(order = %order.id, restaurant = %restaurant.id, total = order.total, "order placed");

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        menu::{Menu, MenuItem},
        restaurants::Restaurant,
    };

    use super::*;

    fn detail() -> RestaurantDetail {
        RestaurantDetail {
            restaurant: Restaurant::new("1", "Himalayan Flavors", ["Nepali"]),
            menu: Menu::new([
                MenuItem::new("m1", "Chicken Momo", 220),
                MenuItem::new("m2", "Veg Thali Set", 350),
            ]),
        }
    }

    #[test]
    fn resolve_stores_detail() {
        let mut sessions = DetailSessions::new();
        let key = sessions.open(RestaurantId::from("1"));

        assert!(sessions.get(key).is_some_and(DetailVisit::is_loading));
        assert_eq!(sessions.resolve(key, Ok(detail())), Resolution::Applied);
        assert!(sessions.get(key).and_then(DetailVisit::menu).is_some());
    }

    #[test]
    fn resolve_after_close_is_discarded() {
        let mut sessions = DetailSessions::new();
        let key = sessions.open(RestaurantId::from("1"));

        assert!(sessions.close(key));
        assert_eq!(sessions.resolve(key, Ok(detail())), Resolution::Discarded);
        assert!(sessions.is_empty());
    }

    #[test]
    fn reused_slot_does_not_accept_old_result() {
        let mut sessions = DetailSessions::new();
        let old = sessions.open(RestaurantId::from("1"));
        sessions.close(old);

        let new = sessions.open(RestaurantId::from("2"));

        assert_eq!(sessions.resolve(old, Ok(detail())), Resolution::Discarded);
        assert!(sessions.get(new).is_some_and(DetailVisit::is_loading));
    }

    #[test]
    fn failed_fetch_is_recorded() {
        let mut sessions = DetailSessions::new();
        let key = sessions.open(RestaurantId::from("9"));

        let resolution = sessions.resolve(
            key,
            Err(CatalogError::RestaurantNotFound(RestaurantId::from("9"))),
        );

        assert_eq!(resolution, Resolution::Failed);
        assert!(sessions.get(key).and_then(DetailVisit::error).is_some());
    }

    #[test]
    fn each_visit_gets_its_own_cart() {
        let mut sessions = DetailSessions::new();
        let first = sessions.open(RestaurantId::from("1"));
        let second = sessions.open(RestaurantId::from("1"));

        sessions.resolve(first, Ok(detail()));
        sessions.resolve(second, Ok(detail()));

        assert!(sessions.add_to_cart(first, &MenuItemId::from("m1")));

        let first_items = sessions.get(first).map(|v| v.cart().total_items());
        let second_items = sessions.get(second).map(|v| v.cart().total_items());

        assert_eq!(first_items, Some(1));
        assert_eq!(second_items, Some(0));
    }

    #[test]
    fn add_to_cart_requires_known_item() {
        let mut sessions = DetailSessions::new();
        let key = sessions.open(RestaurantId::from("1"));

        assert!(!sessions.add_to_cart(key, &MenuItemId::from("m1")));

        sessions.resolve(key, Ok(detail()));

        assert!(!sessions.add_to_cart(key, &MenuItemId::from("m404")));
    }

    #[test]
    fn checkout_places_order_and_clears_cart() -> TestResult {
        let mut sessions = DetailSessions::new();
        let key = sessions.open(RestaurantId::from("1"));
        sessions.resolve(key, Ok(detail()));

        sessions.add_to_cart(key, &MenuItemId::from("m1"));
        sessions.add_to_cart(key, &MenuItemId::from("m1"));
        sessions.add_to_cart(key, &MenuItemId::from("m2"));

        let order = sessions.checkout(key, "Thamel, Kathmandu")?;

        assert_eq!(order.restaurant, "Himalayan Flavors");
        assert_eq!(order.total, 790);
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.progress().steps_completed(), 0);
        assert!(sessions.get(key).is_some_and(|v| v.cart().is_empty()));

        Ok(())
    }

    #[test]
    fn checkout_errors() {
        let mut sessions = DetailSessions::new();
        let key = sessions.open(RestaurantId::from("1"));

        assert_eq!(
            sessions.checkout(key, "Thamel").err(),
            Some(CheckoutError::NotLoaded)
        );

        sessions.resolve(key, Ok(detail()));

        assert_eq!(
            sessions.checkout(key, "Thamel").err(),
            Some(CheckoutError::EmptyCart)
        );

        sessions.close(key);

        assert_eq!(
            sessions.checkout(key, "Thamel").err(),
            Some(CheckoutError::UnknownSession)
        );
    }
}
