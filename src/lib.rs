//! Ghar
//!
//! Ghar is the client ordering state engine behind a food-ordering app: the
//! cart built up on a restaurant page, the paged and searchable restaurant
//! feed, and the delivery progress shown for placed orders.
//!
//! Data comes from a [`catalog::CatalogSource`]; the bundled
//! [`catalog::FixtureCatalog`] serves YAML fixtures with simulated latency.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod listing;
pub mod menu;
pub mod orders;
pub mod receipt;
pub mod restaurants;
pub mod search;
pub mod session;
