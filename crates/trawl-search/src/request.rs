//! Wire payload for the multi-tab search endpoint.

use std::collections::BTreeMap;

use serde::Serialize;

use trawl_shared::constants::{PAGE_SIZE, SORT_BY, SORT_ORDER};
use trawl_shared::SearchTab;

/// Attachment filter values understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HasFilter {
    Image,
    Video,
    File,
}

/// Query parameters for a single tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabQuery {
    pub sort_by: &'static str,
    pub sort_order: &'static str,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    /// Always serialized; `null` requests the first page.
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has: Option<Vec<HasFilter>>,
}

/// Full request body for `POST /users/@me/messages/search/tabs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub tabs: BTreeMap<SearchTab, TabQuery>,
    pub track_exact_total_hits: bool,
}

impl SearchRequest {
    /// The single tab this request targets.
    pub fn tab(&self) -> Option<(SearchTab, &TabQuery)> {
        self.tabs.iter().next().map(|(tab, query)| (*tab, query))
    }
}

/// Build the request for one page of `tab`.
///
/// `query_text` and `author_id` are expected to be trimmed already; empty
/// values are omitted from the payload.
pub fn build(
    tab: SearchTab,
    query_text: &str,
    author_id: &str,
    cursor: Option<&str>,
) -> SearchRequest {
    let has = match tab {
        SearchTab::Messages => None,
        SearchTab::Media => Some(vec![HasFilter::Image, HasFilter::Video]),
        SearchTab::Files => Some(vec![HasFilter::File]),
    };

    let query = TabQuery {
        sort_by: SORT_BY,
        sort_order: SORT_ORDER,
        limit: PAGE_SIZE,
        content: non_empty(query_text),
        author_id: non_empty(author_id),
        cursor: cursor.map(str::to_string),
        has,
    };

    SearchRequest {
        tabs: BTreeMap::from([(tab, query)]),
        track_exact_total_hits: false,
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
