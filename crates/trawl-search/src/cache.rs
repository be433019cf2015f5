//! Per-session result cache keyed by tab, query text and author filter.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use trawl_shared::SearchTab;

use crate::aggregate::TabState;

/// Identity of a search: two keys are equal iff all three trimmed parts are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub tab: SearchTab,
    pub query: String,
    pub author_id: String,
}

impl QueryKey {
    pub fn new(tab: SearchTab, query: &str, author_id: &str) -> Self {
        Self {
            tab,
            query: query.trim().to_string(),
            author_id: author_id.trim().to_string(),
        }
    }

    /// A key with neither query text nor author filter never hits the network.
    pub fn is_searchable(&self) -> bool {
        !self.query.is_empty() || !self.author_id.is_empty()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.tab, self.query, self.author_id)
    }
}

/// Completed results per key.
///
/// Entries are shared snapshots: storing a new page replaces the entry for
/// the key instead of mutating the previous one.
#[derive(Debug, Default)]
pub struct SearchCache {
    entries: HashMap<QueryKey, Arc<TabState>>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<Arc<TabState>> {
        self.entries.get(key).cloned()
    }

    /// Store `state` under `key`, replacing any previous entry.
    pub fn store(&mut self, key: QueryKey, state: Arc<TabState>) {
        debug!(
            %key,
            messages = state.messages.len(),
            has_more = state.has_more(),
            "Caching search results"
        );
        self.entries.insert(key, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_trims_components() {
        let a = QueryKey::new(SearchTab::Media, "  cats ", " 42");
        let b = QueryKey::new(SearchTab::Media, "cats", "42");
        assert_eq!(a, b);
        assert_ne!(a, QueryKey::new(SearchTab::Files, "cats", "42"));
        assert_eq!(a.to_string(), "media:cats:42");
    }

    #[test]
    fn test_searchable_guard() {
        assert!(!QueryKey::new(SearchTab::Messages, "   ", "").is_searchable());
        assert!(!QueryKey::new(SearchTab::Messages, "", " \t").is_searchable());
        assert!(QueryKey::new(SearchTab::Messages, "", "42").is_searchable());
        assert!(QueryKey::new(SearchTab::Messages, "hi", "").is_searchable());
    }

    #[test]
    fn test_store_replaces_entry() {
        let key = QueryKey::new(SearchTab::Messages, "foo", "");
        let mut cache = SearchCache::new();
        assert!(cache.get(&key).is_none());

        let first = Arc::new(TabState {
            cursor: Some("a".into()),
            has_searched: true,
            ..TabState::default()
        });
        cache.store(key.clone(), first.clone());

        let second = Arc::new(TabState {
            cursor: None,
            has_searched: true,
            ..TabState::default()
        });
        cache.store(key.clone(), second);

        assert_eq!(cache.get(&key).unwrap().cursor, None);
        // The earlier snapshot is untouched.
        assert_eq!(first.cursor.as_deref(), Some("a"));
    }
}
