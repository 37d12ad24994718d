//! Search

use std::borrow::Cow;

/// A normalised, non-blank search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    needle: String,
}

impl SearchQuery {
    /// Parse user input into a query.
    ///
    /// Surrounding whitespace is ignored and blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return None;
        }

        Some(Self {
            raw: trimmed.to_string(),
            needle: trimmed.to_lowercase(),
        })
    }

    /// The query as the user typed it, trimmed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Case-insensitive substring test.
    pub fn is_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }
}

/// Catalog entries that can be matched against a [`SearchQuery`].
pub trait Searchable {
    /// Primary name of the entry.
    fn search_name(&self) -> &str;

    /// Secondary label: a restaurant's cuisines or a dish's category.
    fn search_label(&self) -> Option<Cow<'_, str>>;

    /// Whether the query occurs in the name or the label.
    fn matches(&self, query: &SearchQuery) -> bool {
        query.is_in(self.search_name())
            || self
                .search_label()
                .is_some_and(|label| query.is_in(&label))
    }
}

/// Keep entries matching the query, preserving their order.
pub fn filter_matches<T: Searchable>(
    entries: impl IntoIterator<Item = T>,
    query: &SearchQuery,
) -> Vec<T> {
    entries
        .into_iter()
        .filter(|entry| entry.matches(query))
        .collect()
}
