//! Defensive parsing of search response bodies.
//!
//! The backend contract is not enforced client-side, so [`normalize`] never
//! fails: missing wrappers yield an empty page, malformed messages and
//! attachments are dropped, and missing optional fields get explicit
//! defaults.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use trawl_shared::{Attachment, Author, ChannelId, Message, MessageId, SearchTab};

/// One normalized response page for a single tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResultPage {
    /// Messages in backend order, flattened from any nested grouping.
    pub messages: Vec<Message>,
    /// Continuation cursor; `None` once the backend is exhausted.
    pub cursor: Option<String>,
}

/// Parse `body` into the result page for `tab`.
pub fn normalize(body: &Value, tab: SearchTab) -> SearchResultPage {
    let Some(entry) = body
        .get("tabs")
        .and_then(Value::as_object)
        .and_then(|tabs| tabs.get(tab.as_str()))
        .and_then(Value::as_object)
    else {
        debug!(%tab, "Response has no entry for tab");
        return SearchResultPage::default();
    };

    let messages = entry.get("messages").map(to_messages).unwrap_or_default();
    let cursor = entry
        .get("cursor")
        .and_then(Value::as_str)
        .map(str::to_string);

    SearchResultPage { messages, cursor }
}

fn to_messages(value: &Value) -> Vec<Message> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    let flattened = entries.iter().flat_map(|entry| match entry {
        Value::Array(group) => group.iter().collect::<Vec<_>>(),
        other => vec![other],
    });

    let mut messages = Vec::new();
    let mut dropped = 0usize;
    for raw in flattened {
        match to_message(raw) {
            Some(message) => messages.push(message),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(dropped, kept = messages.len(), "Dropped malformed search results");
    }
    messages
}

fn to_message(value: &Value) -> Option<Message> {
    let raw = value.as_object()?;
    let id = get_id(raw, "id")?;
    let channel_id = get_id(raw, "channel_id")?;

    Some(Message {
        id: MessageId::from(id),
        channel_id: ChannelId::from(channel_id),
        content: get_str(raw, "content").unwrap_or_default().to_string(),
        timestamp: get_str(raw, "timestamp")
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        author: raw.get("author").map(to_author).unwrap_or_default(),
        attachments: raw
            .get("attachments")
            .map(to_attachments)
            .unwrap_or_default(),
    })
}

fn to_author(value: &Value) -> Author {
    let Some(raw) = value.as_object() else {
        return Author::unknown();
    };
    let fallback = Author::unknown();

    Author {
        id: get_str(raw, "id").map_or(fallback.id, str::to_string),
        username: get_str(raw, "username").map_or(fallback.username, str::to_string),
        global_name: get_str(raw, "global_name").map(str::to_string),
        avatar: get_str(raw, "avatar").map(str::to_string),
    }
}

fn to_attachments(value: &Value) -> Vec<Attachment> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|raw| {
            let id = get_id(raw, "id")?;
            let filename = get_id(raw, "filename")?;
            Some(Attachment {
                id: id.to_string(),
                filename: filename.to_string(),
                size: raw.get("size").and_then(Value::as_u64),
                url: get_str(raw, "url").map(str::to_string),
                proxy_url: get_str(raw, "proxy_url").map(str::to_string),
                content_type: get_str(raw, "content_type").map(str::to_string),
                width: get_u32(raw, "width"),
                height: get_u32(raw, "height"),
            })
        })
        .collect()
}

fn get_str<'a>(raw: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

/// Identity fields: an empty string counts as missing.
fn get_id<'a>(raw: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    get_str(raw, key).filter(|s| !s.is_empty())
}

fn get_u32(raw: &Map<String, Value>, key: &str) -> Option<u32> {
    raw.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(page: &SearchResultPage) -> Vec<&str> {
        page.messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_missing_wrappers_yield_empty_page() {
        let empty = SearchResultPage::default();
        assert_eq!(normalize(&json!(null), SearchTab::Messages), empty);
        assert_eq!(normalize(&json!({}), SearchTab::Messages), empty);
        assert_eq!(normalize(&json!({ "tabs": [] }), SearchTab::Messages), empty);
        assert_eq!(
            normalize(&json!({ "tabs": { "media": { "messages": [] } } }), SearchTab::Files),
            empty
        );
        assert_eq!(
            normalize(&json!({ "tabs": { "files": { "messages": "nope" } } }), SearchTab::Files),
            empty
        );
    }

    #[test]
    fn test_flattens_nested_groups_one_level() {
        let body = json!({
            "tabs": { "messages": {
                "messages": [
                    [{ "id": "1", "channel_id": "c" }, { "id": "2", "channel_id": "c" }],
                    { "id": "3", "channel_id": "c" },
                    [[{ "id": "deep", "channel_id": "c" }]]
                ],
                "cursor": "next"
            }}
        });

        let page = normalize(&body, SearchTab::Messages);
        assert_eq!(ids(&page), vec!["1", "2", "3"]);
        assert_eq!(page.cursor.as_deref(), Some("next"));
    }

    #[test]
    fn test_drops_messages_without_identity() {
        let body = json!({
            "tabs": { "messages": { "messages": [
                { "channel_id": "c" },
                { "id": "1" },
                { "id": 7, "channel_id": "c" },
                "garbage",
                { "id": "ok", "channel_id": "c" }
            ]}}
        });

        assert_eq!(ids(&normalize(&body, SearchTab::Messages)), vec!["ok"]);
    }

    #[test]
    fn test_drops_empty_identities() {
        let body = json!({
            "tabs": { "messages": { "messages": [
                { "id": "", "channel_id": "c" },
                { "id": "1", "channel_id": "" },
                { "id": "2", "channel_id": "c", "attachments": [
                    { "id": "", "filename": "x.png" },
                    { "id": "a", "filename": "" }
                ]}
            ]}}
        });

        let page = normalize(&body, SearchTab::Messages);
        assert_eq!(ids(&page), vec!["2"]);
        assert!(page.messages[0].attachments.is_empty());
    }

    #[test]
    fn test_fills_defaults() {
        let body = json!({
            "tabs": { "messages": { "messages": [{ "id": "1", "channel_id": "c", "author": 5 }] } }
        });

        let page = normalize(&body, SearchTab::Messages);
        let message = &page.messages[0];
        assert_eq!(message.content, "");
        assert_eq!(message.timestamp, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(message.author, Author::unknown());
        assert!(message.attachments.is_empty());
        assert_eq!(page.cursor, None);
    }

    #[test]
    fn test_parses_full_message() {
        let body = json!({
            "tabs": { "media": {
                "messages": [[{
                    "id": "m1",
                    "channel_id": "c1",
                    "content": "look",
                    "timestamp": "2024-03-01T12:00:00.000000+00:00",
                    "author": { "id": "42", "username": "ana", "global_name": "Ana", "avatar": null },
                    "attachments": [
                        { "id": "a1", "filename": "cat.png", "size": 2048, "content_type": "image/png",
                          "url": "https://cdn/cat.png", "width": 640, "height": 480 },
                        { "id": "a2" },
                        { "id": "a3", "filename": "x.bin", "size": -1, "width": 1.5 }
                    ]
                }]],
                "cursor": 12
            }}
        });

        let page = normalize(&body, SearchTab::Media);
        assert_eq!(page.cursor, None);
        let message = &page.messages[0];
        assert_eq!(message.timestamp.to_rfc3339(), "2024-03-01T12:00:00+00:00");
        assert_eq!(message.author.display_name(), "Ana");
        assert_eq!(message.author.avatar, None);
        assert_eq!(message.attachments.len(), 2);
        assert_eq!(message.attachments[0].size, Some(2048));
        assert_eq!(message.attachments[0].width, Some(640));
        assert_eq!(message.attachments[1].size, None);
        assert_eq!(message.attachments[1].width, None);
    }

    #[test]
    fn test_unparseable_timestamp_is_epoch() {
        let body = json!({
            "tabs": { "messages": { "messages": [
                { "id": "1", "channel_id": "c", "timestamp": "yesterday" }
            ]}}
        });
        let page = normalize(&body, SearchTab::Messages);
        assert_eq!(page.messages[0].timestamp, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_is_deterministic() {
        let body = json!({
            "tabs": { "files": { "messages": [{ "id": "1", "channel_id": "c" }], "cursor": "k" } }
        });
        assert_eq!(
            normalize(&body, SearchTab::Files),
            normalize(&body, SearchTab::Files)
        );
    }
}
