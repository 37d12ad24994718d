//! Incremental Lists
//!
//! A [`ListState`] holds a list that grows page by page as the user scrolls,
//! or is replaced wholesale by search results. At most one fetch is in flight
//! per list: starting a load hands out a [`PageLease`], and only the newest
//! lease may write its result back.

use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use crate::{
    catalog::{CatalogError, CatalogPage, PageRequest, PageSource},
    search::{SearchQuery, Searchable, filter_matches},
};

/// Tuning for list controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    /// Last page that will be fetched; `has_more` is forced off after it
    pub max_pages: u32,

    /// Distance from the bottom, in pixels, that counts as "near the end"
    pub scroll_threshold: u32,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            max_pages: 5,
            scroll_threshold: 200,
        }
    }
}

/// Scroll input from the hosting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSignal {
    /// Scroll offset, visible height and total content height
    Position {
        /// Pixels scrolled from the top
        offset: u32,

        /// Visible height
        viewport: u32,

        /// Total height of the content
        content: u32,
    },

    /// Whether a sentinel at the end of the list is visible
    Intersecting(bool),
}

impl ScrollSignal {
    /// Whether the signal is within `threshold` pixels of the end.
    pub fn near_bottom(self, threshold: u32) -> bool {
        match self {
            ScrollSignal::Position {
                offset,
                viewport,
                content,
            } => offset.saturating_add(viewport).saturating_add(threshold) >= content,
            ScrollSignal::Intersecting(visible) => visible,
        }
    }
}

#[derive(Debug)]
enum LeaseKind {
    Replace,
    Append,
    Search(SearchQuery),
}

/// Permission to write one fetch result into a [`ListState`].
#[derive(Debug)]
#[must_use = "an outstanding lease keeps the list loading until completed"]
pub struct PageLease {
    generation: u64,
    kind: LeaseKind,
    request: PageRequest,
}

impl PageLease {
    /// What to fetch.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }
}

/// What completing a lease did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Entries were written; `received` counts the entries kept from the batch
    Loaded {
        /// Page now showing
        page: u32,

        /// Entries added or, for a replace, now present
        received: usize,
    },

    /// A blank search reset the list to its unsearched state
    Cleared,

    /// The fetch failed and the list is unchanged
    Failed(CatalogError),

    /// The list moved on before the result arrived; nothing was written
    Stale,
}

/// State of one incremental list.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    entries: Vec<T>,
    has_more: bool,
    page: u32,
    query: Option<String>,
    error: Option<CatalogError>,
    settings: ListSettings,
    generation: u64,
    pending: Option<u64>,
}

impl<T> ListState<T> {
    /// Empty, unloaded list.
    ///
    /// Nothing can be paged in until [`ListState::begin_initial`] starts it.
    pub fn new(settings: ListSettings) -> Self {
        Self {
            entries: Vec::new(),
            has_more: false,
            page: 1,
            query: None,
            error: None,
            settings,
            generation: 0,
            pending: None,
        }
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Whether a fetch for this list is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether another page may be fetched.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Last page applied.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Text of the last search that was applied.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Error from the last fetch, cleared by the next success.
    pub fn error(&self) -> Option<&CatalogError> {
        self.error.as_ref()
    }

    /// Settings in effect.
    pub fn settings(&self) -> ListSettings {
        self.settings
    }

    /// Start a fresh list at page 1.
    ///
    /// Any outstanding lease becomes stale.
    pub fn begin_initial(&mut self) -> PageLease {
        self.entries.clear();
        self.page = 1;
        self.has_more = true;
        self.query = None;
        self.error = None;

        self.issue(LeaseKind::Replace, PageRequest::page(1))
    }

    /// Lease for the page after [`ListState::page`].
    ///
    /// Returns `None` while a fetch is outstanding, once the terminal page
    /// has been seen, or when the page cap is reached.
    pub fn begin_next_page(&mut self) -> Option<PageLease> {
        if self.is_loading() || !self.has_more || self.page >= self.settings.max_pages {
            debug!(
                page = self.page,
                loading = self.is_loading(),
                has_more = self.has_more,
                "next page skipped"
            );

            return None;
        }

        let next = self.page.saturating_add(1);

        Some(self.issue(LeaseKind::Append, PageRequest::page(next)))
    }

    /// Whether `signal` should trigger [`ListState::begin_next_page`].
    pub fn should_load_more(&self, signal: ScrollSignal) -> bool {
        signal.near_bottom(self.settings.scroll_threshold)
            && !self.is_loading()
            && self.has_more
            && self.page < self.settings.max_pages
    }

    /// Return to the unsearched, unloaded state.
    ///
    /// Any outstanding lease becomes stale, and paging stays off until the
    /// next [`ListState::begin_initial`].
    pub fn clear(&mut self) {
        self.entries.clear();
        self.page = 1;
        self.has_more = false;
        self.query = None;
        self.error = None;
        self.pending = None;
        self.generation = self.generation.wrapping_add(1);
    }

    fn issue(&mut self, kind: LeaseKind, request: PageRequest) -> PageLease {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(self.generation);

        PageLease {
            generation: self.generation,
            kind,
            request,
        }
    }
}

impl<T: Searchable> ListState<T> {
    /// Lease for a search, or `None` when `raw` is blank.
    ///
    /// A blank query clears the list instead of fetching.
    pub fn begin_search(&mut self, raw: &str) -> Option<PageLease> {
        let Some(query) = SearchQuery::parse(raw) else {
            self.clear();

            return None;
        };

        let request = PageRequest::search(query.as_str());

        Some(self.issue(LeaseKind::Search(query), request))
    }

    /// Write a fetch result back.
    ///
    /// Only the most recently issued lease is applied; anything older is
    /// reported as [`LoadOutcome::Stale`] and leaves the list untouched.
    pub fn complete(
        &mut self,
        lease: PageLease,
        result: Result<CatalogPage<T>, CatalogError>,
    ) -> LoadOutcome {
        if self.pending != Some(lease.generation) {
            warn!(page = lease.request.page, "discarding stale page result");

            return LoadOutcome::Stale;
        }

        self.pending = None;

        let batch = match result {
            Ok(batch) => batch,
            Err(error) => {
                warn!(page = lease.request.page, %error, "page fetch failed");

                self.error = Some(error.clone());

                return LoadOutcome::Failed(error);
            }
        };

        self.error = None;

        let received = match lease.kind {
            LeaseKind::Replace => {
                let received = batch.entries.len();

                self.entries = batch.entries;
                self.page = lease.request.page;
                self.has_more = batch.has_more;

                received
            }
            LeaseKind::Append => {
                let received = batch.entries.len();

                self.entries.extend(batch.entries);
                self.page = lease.request.page;
                self.has_more &= batch.has_more;

                received
            }
            LeaseKind::Search(query) => {
                self.entries = filter_matches(batch.entries, &query);
                self.page = 1;
                self.has_more = false;
                self.query = Some(query.as_str().to_string());

                self.entries.len()
            }
        };

        if self.page >= self.settings.max_pages {
            self.has_more = false;
        }

        debug!(
            page = self.page,
            received,
            total = self.entries.len(),
            has_more = self.has_more,
            "page applied"
        );

        LoadOutcome::Loaded {
            page: self.page,
            received,
        }
    }
}

/// A [`ListState`] wired to the [`PageSource`] that fills it.
pub struct ListController<T> {
    source: Arc<dyn PageSource<T>>,
    state: ListState<T>,
}

impl<T> fmt::Debug for ListController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListController")
            .field("entries", &self.state.entries.len())
            .field("page", &self.state.page)
            .field("has_more", &self.state.has_more)
            .field("loading", &self.state.is_loading())
            .finish_non_exhaustive()
    }
}

impl<T: Searchable + Send> ListController<T> {
    /// Controller over `source`.
    pub fn new(source: Arc<dyn PageSource<T>>, settings: ListSettings) -> Self {
        Self {
            source,
            state: ListState::new(settings),
        }
    }

    /// Current list state.
    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[T] {
        self.state.entries()
    }

    /// Reset and load page 1.
    pub async fn load_initial(&mut self) -> LoadOutcome {
        let lease = self.state.begin_initial();

        self.run(lease).await
    }

    /// Load the next page, or `None` if the guard refused.
    pub async fn load_next_page(&mut self) -> Option<LoadOutcome> {
        let lease = self.state.begin_next_page()?;

        Some(self.run(lease).await)
    }

    /// Replace the entries with matches for `raw`, or clear on a blank query.
    pub async fn search(&mut self, raw: &str) -> LoadOutcome {
        match self.state.begin_search(raw) {
            Some(lease) => self.run(lease).await,
            None => LoadOutcome::Cleared,
        }
    }

    /// Load the next page when `signal` is near the end of the list.
    pub async fn on_scroll(&mut self, signal: ScrollSignal) -> Option<LoadOutcome> {
        if !self.state.should_load_more(signal) {
            return None;
        }

        self.load_next_page().await
    }

    async fn run(&mut self, lease: PageLease) -> LoadOutcome {
        let result = self.source.fetch_page(lease.request().clone()).await;

        self.state.complete(lease, result)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        catalog::{MockCatalogSource, RestaurantFeed},
        restaurants::Restaurant,
    };

    use super::*;

    fn restaurants(page: u32) -> Vec<Restaurant> {
        vec![
            Restaurant::new(format!("1-{page}"), "Himalayan Flavors", ["Nepali", "Tibetan"]),
            Restaurant::new(format!("2-{page}"), "Momo House", ["Nepali", "Chinese"]),
        ]
    }

    fn page_of(page: u32, has_more: bool) -> CatalogPage<Restaurant> {
        CatalogPage {
            page,
            entries: restaurants(page),
            has_more,
        }
    }

    fn controller(catalog: MockCatalogSource, settings: ListSettings) -> ListController<Restaurant> {
        ListController::new(Arc::new(RestaurantFeed::new(Arc::new(catalog))), settings)
    }

    fn ids(entries: &[Restaurant]) -> Vec<&str> {
        entries.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn load_initial_sets_first_page() {
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_fetch_restaurants()
            .withf(|request| request.page == 1)
            .times(1)
            .returning(|request| Ok(page_of(request.page, true)));

        let mut list = controller(catalog, ListSettings::default());

        let outcome = list.load_initial().await;

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                page: 1,
                received: 2
            }
        );
        assert_eq!(ids(list.entries()), ["1-1", "2-1"]);
        assert!(list.state().has_more());
        assert!(!list.state().is_loading());
    }

    #[tokio::test]
    async fn next_page_appends_after_existing_entries() -> TestResult {
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_fetch_restaurants()
            .returning(|request| Ok(page_of(request.page, request.page < 2)));

        let mut list = controller(catalog, ListSettings::default());

        list.load_initial().await;
        let outcome = list.load_next_page().await.ok_or("guard refused")?;

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                page: 2,
                received: 2
            }
        );
        assert_eq!(ids(list.entries()), ["1-1", "2-1", "1-2", "2-2"]);
        assert!(!list.state().has_more());
        assert_eq!(list.load_next_page().await, None);

        Ok(())
    }

    #[tokio::test]
    async fn page_cap_stops_an_endless_feed() {
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_fetch_restaurants()
            .times(3)
            .returning(|request| Ok(page_of(request.page, true)));

        let mut list = controller(
            catalog,
            ListSettings {
                max_pages: 3,
                ..ListSettings::default()
            },
        );

        list.load_initial().await;

        while list.load_next_page().await.is_some() {}

        assert_eq!(list.state().page(), 3);
        assert_eq!(list.entries().len(), 6);
        assert!(!list.state().has_more());

        for _ in 0..3 {
            assert_eq!(list.load_next_page().await, None);
        }

        assert!(!list.state().has_more());
    }

    #[test]
    fn next_page_refused_while_loading() -> TestResult {
        let mut state = ListState::<Restaurant>::new(ListSettings::default());

        let first = state.begin_initial();
        state.complete(first, Ok(page_of(1, true)));

        let lease = state.begin_next_page().ok_or("guard refused")?;

        assert!(state.is_loading());
        assert!(state.begin_next_page().is_none());
        assert!(!state.should_load_more(ScrollSignal::Intersecting(true)));
        assert_eq!(state.page(), 1);
        assert_eq!(state.entries().len(), 2);

        state.complete(lease, Ok(page_of(2, true)));

        assert_eq!(state.page(), 2);

        Ok(())
    }

    #[test]
    fn next_page_refused_after_terminal_page() {
        let mut state = ListState::<Restaurant>::new(ListSettings::default());

        let lease = state.begin_initial();
        state.complete(lease, Ok(page_of(1, false)));

        assert!(state.begin_next_page().is_none());
        assert_eq!(state.page(), 1);
        assert_eq!(state.entries().len(), 2);
    }

    #[tokio::test]
    async fn failure_keeps_entries_and_allows_retry() -> TestResult {
        let mut catalog = MockCatalogSource::new();
        let mut calls = 0;

        catalog.expect_fetch_restaurants().returning(move |request| {
            calls += 1;

            if calls == 2 {
                Err(CatalogError::Fetch("connection reset".to_string()))
            } else {
                Ok(page_of(request.page, true))
            }
        });

        let mut list = controller(catalog, ListSettings::default());

        list.load_initial().await;

        let failed = list.load_next_page().await.ok_or("guard refused")?;

        assert!(matches!(failed, LoadOutcome::Failed(CatalogError::Fetch(_))));
        assert_eq!(ids(list.entries()), ["1-1", "2-1"]);
        assert_eq!(list.state().page(), 1);
        assert!(list.state().has_more());
        assert!(!list.state().is_loading());
        assert!(list.state().error().is_some());

        let retried = list.load_next_page().await.ok_or("guard refused")?;

        assert_eq!(
            retried,
            LoadOutcome::Loaded {
                page: 2,
                received: 2
            }
        );
        assert!(list.state().error().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn failed_search_keeps_previous_query_and_entries() {
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_fetch_restaurants()
            .returning(|request| match request.query.as_deref() {
                Some("momo") => Ok(CatalogPage::terminal(restaurants(1))),
                Some(_) => Err(CatalogError::Fetch("connection reset".to_string())),
                None => Ok(page_of(request.page, true)),
            });

        let mut list = controller(catalog, ListSettings::default());

        list.load_initial().await;
        list.search("momo").await;

        assert_eq!(list.state().query(), Some("momo"));
        assert_eq!(ids(list.entries()), ["2-1"]);

        let failed = list.search("thali").await;

        assert!(matches!(failed, LoadOutcome::Failed(CatalogError::Fetch(_))));
        assert_eq!(list.state().query(), Some("momo"));
        assert_eq!(ids(list.entries()), ["2-1"]);
        assert!(list.state().error().is_some());
        assert!(!list.state().is_loading());
    }

    #[test]
    fn result_for_superseded_lease_is_discarded() -> TestResult {
        let mut state = ListState::<Restaurant>::new(ListSettings::default());

        let initial = state.begin_initial();
        state.complete(initial, Ok(page_of(1, true)));

        let next = state.begin_next_page().ok_or("guard refused")?;
        let search = state.begin_search("momo").ok_or("blank query")?;

        assert_eq!(state.complete(next, Ok(page_of(2, true))), LoadOutcome::Stale);
        assert!(state.is_loading());
        assert_eq!(state.entries().len(), 2);

        let outcome = state.complete(
            search,
            Ok(CatalogPage::terminal(restaurants(1))),
        );

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                page: 1,
                received: 1
            }
        );

        Ok(())
    }

    #[test]
    fn result_after_clear_is_discarded() {
        let mut state = ListState::<Restaurant>::new(ListSettings::default());

        let lease = state.begin_initial();
        state.clear();

        assert!(!state.is_loading());
        assert_eq!(state.complete(lease, Ok(page_of(1, true))), LoadOutcome::Stale);
        assert!(state.entries().is_empty());
    }

    #[tokio::test]
    async fn search_replaces_entries_with_matches() {
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_fetch_restaurants()
            .returning(|request| match request.query {
                Some(_) => Ok(CatalogPage::terminal(vec![
                    Restaurant::new("1", "Himalayan Flavors", ["Nepali", "Tibetan"]),
                    Restaurant::new("2", "Momo House", ["Nepali", "Chinese"]),
                    Restaurant::new("5", "Thakali Kitchen", ["Nepali"]),
                ])),
                None => Ok(page_of(request.page, true)),
            });

        let mut list = controller(catalog, ListSettings::default());

        list.load_initial().await;
        let outcome = list.search("  MoMo ").await;

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                page: 1,
                received: 1
            }
        );
        assert_eq!(ids(list.entries()), ["2"]);
        assert_eq!(list.state().query(), Some("MoMo"));
        assert!(!list.state().has_more());
        assert_eq!(list.load_next_page().await, None);

        let by_cuisine = list.search("tibet").await;

        assert!(matches!(by_cuisine, LoadOutcome::Loaded { received: 1, .. }));
        assert_eq!(ids(list.entries()), ["1"]);
    }

    #[tokio::test]
    async fn blank_search_clears_without_fetching() {
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_fetch_restaurants()
            .times(1)
            .returning(|_| Ok(CatalogPage::terminal(restaurants(1))));

        let mut list = controller(catalog, ListSettings::default());

        list.search("momo").await;

        assert_eq!(list.search("").await, LoadOutcome::Cleared);
        assert_eq!(list.search("   ").await, LoadOutcome::Cleared);
        assert!(list.entries().is_empty());
        assert_eq!(list.state().query(), None);
        assert!(!list.state().has_more());
        assert_eq!(list.state().page(), 1);
    }

    #[tokio::test]
    async fn cleared_list_does_not_page_until_reloaded() -> TestResult {
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_fetch_restaurants()
            .withf(|request| request.page == 1)
            .times(3)
            .returning(|request| match request.query {
                Some(_) => Ok(CatalogPage::terminal(restaurants(1))),
                None => Ok(page_of(1, false)),
            });

        let mut list = controller(catalog, ListSettings::default());

        list.load_initial().await;

        assert!(!list.state().has_more());

        list.search("momo").await;

        assert_eq!(list.search("").await, LoadOutcome::Cleared);
        assert!(!list.state().has_more());
        assert_eq!(list.on_scroll(ScrollSignal::Intersecting(true)).await, None);
        assert_eq!(list.load_next_page().await, None);
        assert!(list.entries().is_empty());

        let reloaded = list.load_initial().await;

        assert_eq!(
            reloaded,
            LoadOutcome::Loaded {
                page: 1,
                received: 2
            }
        );
        assert_eq!(ids(list.entries()), ["1-1", "2-1"]);

        Ok(())
    }

    #[test]
    fn unloaded_list_does_not_page() {
        let mut state = ListState::<Restaurant>::new(ListSettings::default());

        assert!(state.begin_next_page().is_none());
        assert!(!state.should_load_more(ScrollSignal::Intersecting(true)));
        assert!(!state.is_loading());
    }

    #[test]
    fn scroll_position_near_bottom() {
        let near = ScrollSignal::Position {
            offset: 650,
            viewport: 800,
            content: 1600,
        };
        let far = ScrollSignal::Position {
            offset: 100,
            viewport: 800,
            content: 1600,
        };

        assert!(near.near_bottom(200));
        assert!(!far.near_bottom(200));
        assert!(!ScrollSignal::Intersecting(false).near_bottom(200));
    }

    #[tokio::test]
    async fn scrolling_loads_only_near_the_end() -> TestResult {
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_fetch_restaurants()
            .times(2)
            .returning(|request| Ok(page_of(request.page, true)));

        let mut list = controller(catalog, ListSettings::default());

        list.load_initial().await;

        let far = ScrollSignal::Position {
            offset: 0,
            viewport: 600,
            content: 2000,
        };

        assert_eq!(list.on_scroll(far).await, None);

        let loaded = list
            .on_scroll(ScrollSignal::Intersecting(true))
            .await
            .ok_or("scroll ignored")?;

        assert!(matches!(loaded, LoadOutcome::Loaded { page: 2, .. }));

        Ok(())
    }
}
