//! Accumulated per-tab results and the views derived from them.

use std::collections::HashSet;

use serde::Serialize;

use trawl_shared::{Attachment, Message, MessageId, SearchTab};

use crate::classify::classify;
use crate::normalize::SearchResultPage;

/// How an incoming page is folded into existing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppendMode {
    /// Fresh search: discard what was accumulated.
    Replace,
    /// Load more: keep what was accumulated and add unseen messages at the tail.
    Append,
}

/// Accumulated results for one query key.
///
/// Message ids are unique.  `cursor` is `None` once the backend has signalled
/// exhaustion (or before the first search).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabState {
    pub messages: Vec<Message>,
    pub cursor: Option<String>,
    /// Distinguishes "never searched" from "searched, nothing found".
    pub has_searched: bool,
}

impl TabState {
    /// Fold `page` into this state, returning the new state.
    pub fn with_page(&self, page: SearchResultPage, mode: AppendMode) -> TabState {
        let messages = match mode {
            AppendMode::Replace => merge(Vec::new(), page.messages),
            AppendMode::Append => merge(self.messages.clone(), page.messages),
        };

        TabState {
            messages,
            cursor: page.cursor,
            has_searched: true,
        }
    }

    /// Whether another page can be requested.
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn find(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Whether `tab` should show its "no results" state: a search has
    /// completed and the view for that tab has nothing in it.
    pub fn is_empty_for(&self, tab: SearchTab) -> bool {
        if !self.has_searched {
            return false;
        }
        match tab {
            SearchTab::Messages => self.messages.is_empty(),
            SearchTab::Media => media_items(self).is_empty(),
            SearchTab::Files => file_items(self).is_empty(),
        }
    }
}

/// Append `incoming` to `existing`, skipping ids already present.
fn merge(mut existing: Vec<Message>, incoming: Vec<Message>) -> Vec<Message> {
    let mut seen: HashSet<MessageId> = existing.iter().map(|m| m.id.clone()).collect();
    for message in incoming {
        if seen.insert(message.id.clone()) {
            existing.push(message);
        }
    }
    existing
}

/// An attachment together with the message that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentItem<'a> {
    pub message: &'a Message,
    pub attachment: &'a Attachment,
}

/// Image and video attachments across all accumulated messages.
pub fn media_items(state: &TabState) -> Vec<AttachmentItem<'_>> {
    attachment_items(state, true)
}

/// Every attachment that is neither an image nor a video.
pub fn file_items(state: &TabState) -> Vec<AttachmentItem<'_>> {
    attachment_items(state, false)
}

fn attachment_items(state: &TabState, media: bool) -> Vec<AttachmentItem<'_>> {
    state
        .messages
        .iter()
        .flat_map(|message| {
            message
                .attachments
                .iter()
                .map(move |attachment| AttachmentItem { message, attachment })
        })
        .filter(|item| classify(item.attachment).is_media() == media)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use trawl_shared::{Author, ChannelId};

    fn message(id: &str) -> Message {
        Message {
            id: MessageId::from(id),
            channel_id: ChannelId::from("c"),
            content: format!("message {id}"),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            author: Author::unknown(),
            attachments: Vec::new(),
        }
    }

    fn page(ids: &[&str], cursor: Option<&str>) -> SearchResultPage {
        SearchResultPage {
            messages: ids.iter().map(|id| message(id)).collect(),
            cursor: cursor.map(str::to_string),
        }
    }

    fn first_page(ids: &[&str], cursor: Option<&str>) -> TabState {
        TabState::default().with_page(page(ids, cursor), AppendMode::Replace)
    }

    fn ids(state: &TabState) -> Vec<&str> {
        state.messages.iter().map(|m| m.id.as_str()).collect()
    }

    fn attachment(id: &str, filename: &str, content_type: Option<&str>) -> Attachment {
        Attachment {
            id: id.into(),
            filename: filename.into(),
            size: None,
            url: None,
            proxy_url: None,
            content_type: content_type.map(str::to_string),
            width: None,
            height: None,
        }
    }

    #[test]
    fn test_append_keeps_first_seen_order() {
        let state = first_page(&["A", "B"], Some("c1"));
        let state = state.with_page(page(&["B", "C"], Some("c2")), AppendMode::Append);

        assert_eq!(ids(&state), vec!["A", "B", "C"]);
        assert_eq!(state.cursor.as_deref(), Some("c2"));
    }

    #[test]
    fn test_replace_discards_previous() {
        let state = first_page(&["A", "B"], Some("c1"));
        let state = state.with_page(page(&["C", "D"], None), AppendMode::Replace);

        assert_eq!(ids(&state), vec!["C", "D"]);
        assert!(!state.has_more());
        assert!(state.has_searched);
    }

    #[test]
    fn test_replace_dedupes_within_page() {
        let state = first_page(&["A", "B", "A"], None);
        assert_eq!(ids(&state), vec!["A", "B"]);
    }

    #[test]
    fn test_ids_stay_unique_across_many_pages() {
        let pages: [&[&str]; 4] = [&["1", "2", "3"], &["3", "4"], &["1", "4", "5", "5"], &["2"]];
        let mut state = TabState::default();
        for (i, ids_in_page) in pages.iter().enumerate() {
            let mode = if i == 0 { AppendMode::Replace } else { AppendMode::Append };
            state = state.with_page(page(ids_in_page, Some("more")), mode);

            let unique: HashSet<_> = state.messages.iter().map(|m| &m.id).collect();
            assert_eq!(unique.len(), state.messages.len());
        }
        assert_eq!(ids(&state), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_append_exhaustion_clears_cursor() {
        let state = first_page(&["A"], Some("c1"));
        let state = state.with_page(page(&[], None), AppendMode::Append);
        assert_eq!(ids(&state), vec!["A"]);
        assert!(!state.has_more());
    }

    #[test]
    fn test_media_and_file_views() {
        let mut m = message("m1");
        m.attachments = vec![
            attachment("a1", "photo", Some("image/png")),
            attachment("a2", "report.pdf", None),
        ];
        let mut v = message("m2");
        v.attachments = vec![attachment("a3", "clip.mp4", None)];
        let state = TabState {
            messages: vec![m, v, message("m3")],
            cursor: None,
            has_searched: true,
        };

        let media: Vec<_> = media_items(&state).iter().map(|i| i.attachment.id.as_str()).collect();
        let files: Vec<_> = file_items(&state).iter().map(|i| i.attachment.id.as_str()).collect();
        assert_eq!(media, vec!["a1", "a3"]);
        assert_eq!(files, vec!["a2"]);
        assert_eq!(file_items(&state)[0].message.id.as_str(), "m1");
    }

    #[test]
    fn test_empty_state_rules() {
        assert!(!TabState::default().is_empty_for(SearchTab::Messages));

        let state = first_page(&["A"], None);
        assert!(!state.is_empty_for(SearchTab::Messages));
        assert!(state.is_empty_for(SearchTab::Media));
        assert!(state.is_empty_for(SearchTab::Files));

        let searched_nothing = first_page(&[], None);
        assert!(searched_nothing.is_empty_for(SearchTab::Messages));
    }

    #[test]
    fn test_find() {
        let state = first_page(&["A", "B"], None);
        assert!(state.find(&MessageId::from("B")).is_some());
        assert!(state.find(&MessageId::from("Z")).is_none());
    }
}
