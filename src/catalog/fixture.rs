//! Fixture-backed catalog with simulated latency.

use std::time::Duration;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::time::sleep;
use tracing::debug;

use crate::{
    catalog::{CatalogError, CatalogPage, CatalogSource, PageRequest},
    fixtures::CatalogData,
    menu::Menu,
    orders::{OrderId, OrderRecord},
    restaurants::{Restaurant, RestaurantDetail, RestaurantId},
    search::{SearchQuery, filter_matches},
};

/// How the restaurant feed pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedMode {
    /// Slice the restaurant list by page size; the last slice is terminal.
    #[default]
    Paged,

    /// Every page repeats the full list with page-suffixed ids and never ends.
    Cycling,
}

/// Tuning for [`FixtureCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureCatalogSettings {
    /// Restaurants per page in [`FeedMode::Paged`]
    pub page_size: usize,

    /// Delay before every response
    pub latency: Duration,

    /// Feed paging behaviour
    pub mode: FeedMode,
}

impl Default for FixtureCatalogSettings {
    fn default() -> Self {
        Self {
            page_size: 6,
            latency: Duration::from_millis(1500),
            mode: FeedMode::Paged,
        }
    }
}

/// In-memory [`CatalogSource`] serving [`CatalogData`].
#[derive(Debug, Clone)]
pub struct FixtureCatalog {
    restaurants: Vec<Restaurant>,
    menus: FxHashMap<RestaurantId, Menu>,
    orders: Vec<OrderRecord>,
    settings: FixtureCatalogSettings,
}

impl FixtureCatalog {
    /// Serve `data` with the given settings.
    pub fn new(data: CatalogData, settings: FixtureCatalogSettings) -> Self {
        Self {
            restaurants: data.restaurants,
            menus: data.menus,
            orders: data.orders,
            settings,
        }
    }

    /// Settings in effect.
    pub fn settings(&self) -> FixtureCatalogSettings {
        self.settings
    }

    async fn delay(&self) {
        if !self.settings.latency.is_zero() {
            sleep(self.settings.latency).await;
        }
    }

    fn find_restaurant(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|restaurant| &restaurant.id == id)
    }

    fn feed_page(&self, page: u32) -> CatalogPage<Restaurant> {
        match self.settings.mode {
            FeedMode::Paged => {
                let size = self.settings.page_size.max(1);
                let start = usize::try_from(page.saturating_sub(1))
                    .unwrap_or(usize::MAX)
                    .saturating_mul(size);
                let end = start.saturating_add(size).min(self.restaurants.len());

                let entries = self
                    .restaurants
                    .get(start..end)
                    .map(<[Restaurant]>::to_vec)
                    .unwrap_or_default();

                CatalogPage {
                    page,
                    entries,
                    has_more: end < self.restaurants.len(),
                }
            }
            FeedMode::Cycling => {
                let entries = if page <= 1 {
                    self.restaurants.clone()
                } else {
                    self.restaurants
                        .iter()
                        .map(|restaurant| restaurant.with_page_suffix(page))
                        .collect()
                };

                CatalogPage {
                    page,
                    entries,
                    has_more: true,
                }
            }
        }
    }
}

#[async_trait]
impl CatalogSource for FixtureCatalog {
    async fn fetch_restaurants(
        &self,
        request: PageRequest,
    ) -> Result<CatalogPage<Restaurant>, CatalogError> {
        self.delay().await;

        let page = match request.query.as_deref().and_then(SearchQuery::parse) {
            Some(query) => CatalogPage::terminal(filter_matches(
                self.restaurants.iter().cloned(),
                &query,
            )),
            None => self.feed_page(request.page),
        };

        debug!(
            page = request.page,
            entries = page.entries.len(),
            has_more = page.has_more,
            "served restaurant page"
        );

        Ok(page)
    }

    async fn fetch_restaurant(&self, id: RestaurantId) -> Result<RestaurantDetail, CatalogError> {
        self.delay().await;

        let restaurant = self
            .find_restaurant(&id)
            .or_else(|| self.find_restaurant(&id.base()))
            .ok_or_else(|| CatalogError::RestaurantNotFound(id.clone()))?;

        Ok(RestaurantDetail {
            menu: self.menus.get(&restaurant.id).cloned().unwrap_or_default(),
            restaurant: Restaurant {
                id,
                ..restaurant.clone()
            },
        })
    }

    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, CatalogError> {
        self.delay().await;

        Ok(self.orders.clone())
    }

    async fn fetch_order(&self, id: OrderId) -> Result<OrderRecord, CatalogError> {
        self.delay().await;

        self.orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or(CatalogError::OrderNotFound(id))
    }
}
