//! In-memory collaborators for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use trawl_shared::SearchTab;

use crate::backend::SearchBackend;
use crate::error::BackendError;
use crate::navigate::{JumpTarget, Navigator};
use crate::request::SearchRequest;

type Reply = Result<Value, BackendError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Backend that replays scripted replies in order and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, body: Value) {
        self.push(Scripted::Ready(Ok(body)));
    }

    pub fn push_err(&self, error: BackendError) {
        self.push(Scripted::Ready(Err(error)));
    }

    /// Queue a reply that is held back until the returned sender fires.
    pub fn push_gated(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, entry: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(entry);
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn post_search(&self, request: &SearchRequest) -> Result<Value, BackendError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(BackendError::Transport("gate dropped".into()))),
            None => Err(BackendError::Transport("no scripted reply".into())),
        }
    }
}

/// Navigator that remembers every jump.
#[derive(Default)]
pub struct RecordingNavigator {
    jumps: Mutex<Vec<JumpTarget>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jumps(&self) -> Vec<JumpTarget> {
        self.jumps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &JumpTarget) {
        self.jumps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target.clone());
    }
}

/// Response body with one message per id in channel `c1`.
pub fn page_body(tab: SearchTab, ids: &[&str], cursor: Option<&str>) -> Value {
    let messages: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "channel_id": "c1",
                "content": format!("message {id}"),
                "timestamp": "2024-01-01T00:00:00+00:00",
                "author": { "id": "42", "username": "ana" },
                "attachments": []
            })
        })
        .collect();

    let mut tabs = serde_json::Map::new();
    tabs.insert(
        tab.as_str().to_string(),
        json!({
            "messages": [messages],
            "cursor": cursor,
            "total_results": ids.len()
        }),
    );
    json!({ "tabs": tabs })
}
