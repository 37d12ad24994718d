//! Catalog
//!
//! The data-access seam. Everything the engine shows comes through a
//! [`CatalogSource`]; list controllers consume it through the narrower
//! [`PageSource`] adapters.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    menu::MenuItem,
    orders::{OrderId, OrderRecord},
    restaurants::{Restaurant, RestaurantDetail, RestaurantId},
};

mod fixture;

pub use fixture::{FeedMode, FixtureCatalog, FixtureCatalogSettings};

/// Errors surfaced by a catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The requested restaurant does not exist.
    #[error("restaurant {0} not found")]
    RestaurantNotFound(RestaurantId),

    /// The requested order does not exist.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Transport or backend failure.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Which slice of a list to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// One-based page number
    pub page: u32,

    /// Search text, `None` for the unfiltered feed
    pub query: Option<String>,
}

impl PageRequest {
    /// Request for a page of the unfiltered feed.
    pub fn page(page: u32) -> Self {
        Self { page, query: None }
    }

    /// Request for search candidates.
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            page: 1,
            query: Some(query.into()),
        }
    }
}

/// One batch of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage<T> {
    /// Page that produced this batch
    pub page: u32,

    /// Entries in display order
    pub entries: Vec<T>,

    /// `false` when this is the terminal page
    pub has_more: bool,
}

impl<T> CatalogPage<T> {
    /// Terminal single-page result.
    pub fn terminal(entries: Vec<T>) -> Self {
        Self {
            page: 1,
            entries,
            has_more: false,
        }
    }
}

/// Asynchronous supplier of restaurants, menus and orders.
#[automock]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch a page of restaurant listings.
    async fn fetch_restaurants(
        &self,
        request: PageRequest,
    ) -> Result<CatalogPage<Restaurant>, CatalogError>;

    /// Fetch a restaurant and its menu.
    async fn fetch_restaurant(&self, id: RestaurantId) -> Result<RestaurantDetail, CatalogError>;

    /// Fetch the customer's orders, newest first.
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, CatalogError>;

    /// Fetch the current state of one order.
    async fn fetch_order(&self, id: OrderId) -> Result<OrderRecord, CatalogError>;
}

/// Paged supplier of a single kind of entry.
#[async_trait]
pub trait PageSource<T: Send>: Send + Sync {
    /// Fetch one page.
    async fn fetch_page(&self, request: PageRequest) -> Result<CatalogPage<T>, CatalogError>;
}

/// The restaurant feed of a catalog.
#[derive(Clone)]
pub struct RestaurantFeed {
    catalog: Arc<dyn CatalogSource>,
}

impl RestaurantFeed {
    /// Feed backed by `catalog`.
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }
}

impl std::fmt::Debug for RestaurantFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestaurantFeed").finish_non_exhaustive()
    }
}

#[async_trait]
impl PageSource<Restaurant> for RestaurantFeed {
    async fn fetch_page(
        &self,
        request: PageRequest,
    ) -> Result<CatalogPage<Restaurant>, CatalogError> {
        self.catalog.fetch_restaurants(request).await
    }
}

/// One restaurant's menu, served as a single terminal page.
#[derive(Clone)]
pub struct MenuFeed {
    catalog: Arc<dyn CatalogSource>,
    restaurant: RestaurantId,
}

impl MenuFeed {
    /// Menu of `restaurant` in `catalog`.
    pub fn new(catalog: Arc<dyn CatalogSource>, restaurant: RestaurantId) -> Self {
        Self {
            catalog,
            restaurant,
        }
    }
}

impl std::fmt::Debug for MenuFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuFeed")
            .field("restaurant", &self.restaurant)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageSource<MenuItem> for MenuFeed {
    async fn fetch_page(&self, request: PageRequest) -> Result<CatalogPage<MenuItem>, CatalogError> {
        let detail = self.catalog.fetch_restaurant(self.restaurant.clone()).await?;

        Ok(CatalogPage {
            page: request.page,
            entries: detail.menu.into_items(),
            has_more: false,
        })
    }
}
