//! Client Sessions
//!
//! Everything one signed-in app instance holds: who is signed in, which
//! restaurant pages are open, and the catalog they all read from.

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::info;

use crate::{
    catalog::{CatalogError, CatalogSource, MenuFeed, RestaurantFeed},
    listing::{ListController, ListSettings},
    menu::MenuItem,
    orders::{OrderHistory, OrderRecord, tracker::OrderTracker},
    restaurants::{Restaurant, RestaurantId},
};

mod detail;

pub use detail::{CheckoutError, DetailKey, DetailSessions, DetailVisit, Resolution};

/// Sign-in failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A required field was blank
    #[error("please fill in all fields")]
    MissingCredentials,
}

/// A signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Display name, known after sign-up
    pub name: Option<String>,

    /// Login email
    pub email: String,
}

/// Where the app opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRoute {
    /// First run
    Onboarding,

    /// Onboarding seen, nobody signed in
    Login,

    /// Signed in
    Home,
}

/// Sign-in state and the onboarding flag.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    account: Option<Account>,
    has_seen_onboarding: bool,
}

impl AuthSession {
    /// Signed out, onboarding not yet seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign in with an email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] if either field is blank.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&Account, AuthError> {
        require_filled(&[email, password])?;

        info!("signed in");

        Ok(self.account.insert(Account {
            name: None,
            email: email.trim().to_string(),
        }))
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] if any field is blank.
    pub fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<&Account, AuthError> {
        require_filled(&[name, email, password])?;

        info!("account created");

        Ok(self.account.insert(Account {
            name: Some(name.trim().to_string()),
            email: email.trim().to_string(),
        }))
    }

    /// Sign out.
    pub fn logout(&mut self) {
        if self.account.take().is_some() {
            info!("signed out");
        }
    }

    /// The signed-in account.
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    /// Whether someone is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.account.is_some()
    }

    /// Record that onboarding was shown or skipped.
    pub fn complete_onboarding(&mut self) {
        self.has_seen_onboarding = true;
    }

    /// Whether onboarding was shown or skipped.
    pub fn has_seen_onboarding(&self) -> bool {
        self.has_seen_onboarding
    }

    /// First screen to show after the splash.
    pub fn launch_route(&self) -> LaunchRoute {
        match (self.has_seen_onboarding, self.is_signed_in()) {
            (false, _) => LaunchRoute::Onboarding,
            (true, false) => LaunchRoute::Login,
            (true, true) => LaunchRoute::Home,
        }
    }
}

fn require_filled(fields: &[&str]) -> Result<(), AuthError> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(AuthError::MissingCredentials);
    }

    Ok(())
}

/// An app instance's state.
pub struct ClientSession {
    catalog: Arc<dyn CatalogSource>,
    settings: ListSettings,
    auth: AuthSession,
    details: DetailSessions,
}

impl fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSession")
            .field("settings", &self.settings)
            .field("auth", &self.auth)
            .field("details", &self.details.len())
            .finish_non_exhaustive()
    }
}

impl ClientSession {
    /// Session reading from `catalog`.
    pub fn new(catalog: Arc<dyn CatalogSource>, settings: ListSettings) -> Self {
        Self {
            catalog,
            settings,
            auth: AuthSession::new(),
            details: DetailSessions::new(),
        }
    }

    /// Sign-in state.
    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    /// Mutable sign-in state.
    pub fn auth_mut(&mut self) -> &mut AuthSession {
        &mut self.auth
    }

    /// Open restaurant visits.
    pub fn details(&self) -> &DetailSessions {
        &self.details
    }

    /// Mutable restaurant visits.
    pub fn details_mut(&mut self) -> &mut DetailSessions {
        &mut self.details
    }

    /// Fresh controller for the restaurant feed and restaurant search.
    pub fn restaurant_list(&self) -> ListController<Restaurant> {
        ListController::new(
            Arc::new(RestaurantFeed::new(Arc::clone(&self.catalog))),
            self.settings,
        )
    }

    /// Fresh controller for one restaurant's menu.
    pub fn menu_list(&self, restaurant: RestaurantId) -> ListController<MenuItem> {
        ListController::new(
            Arc::new(MenuFeed::new(Arc::clone(&self.catalog), restaurant)),
            self.settings,
        )
    }

    /// Open a restaurant page and load its detail.
    pub async fn visit_restaurant(&mut self, restaurant: RestaurantId) -> (DetailKey, Resolution) {
        let key = self.details.open(restaurant.clone());
        let result = self.catalog.fetch_restaurant(restaurant).await;

        (key, self.details.resolve(key, result))
    }

    /// Orders split into active and past.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the fetch fails.
    pub async fn order_history(&self) -> Result<OrderHistory, CatalogError> {
        let orders = self.catalog.fetch_orders().await?;

        Ok(OrderHistory::partition(orders))
    }

    /// Tracker following `order`.
    pub fn track_order(&self, order: OrderRecord) -> OrderTracker {
        OrderTracker::new(Arc::clone(&self.catalog), order)
    }
}
