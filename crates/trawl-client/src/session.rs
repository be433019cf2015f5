//! One open search overlay.
//!
//! [`SearchSession`] holds the user's inputs (active tab, query text, author
//! filter) and turns input events into coordinator calls.  Rendering stays
//! with the host; it reads [`SearchSession::snapshot`] or subscribes to
//! changes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use trawl_search::{
    AppendMode, JumpTarget, Navigator, QueryKey, SearchBackend, SearchCoordinator, SearchError,
    SearchOutcome, SearchSnapshot,
};
use trawl_shared::{MessageId, SearchTab};

use crate::config::ClientConfig;
use crate::debounce::QueryDebouncer;

#[derive(Debug, Default)]
struct Inputs {
    tab: SearchTab,
    raw_query: String,
    /// Debounced, trimmed query text used for keys.
    effective_query: String,
    author_id: String,
    current_user_id: Option<String>,
}

pub struct SearchSession<B> {
    coordinator: SearchCoordinator<B>,
    navigator: Arc<dyn Navigator>,
    debouncer: QueryDebouncer,
    inputs: Mutex<Inputs>,
}

impl<B: SearchBackend> SearchSession<B> {
    pub fn new(backend: B, navigator: Arc<dyn Navigator>, config: &ClientConfig) -> Self {
        Self {
            coordinator: SearchCoordinator::new(backend),
            navigator,
            debouncer: QueryDebouncer::new(config.debounce),
            inputs: Mutex::new(Inputs::default()),
        }
    }

    /// Remember the signed-in user's id for [`use_current_user`](Self::use_current_user).
    pub fn with_current_user(self, user_id: impl Into<String>) -> Self {
        self.inputs().current_user_id = Some(user_id.into());
        self
    }

    pub fn active_tab(&self) -> SearchTab {
        self.inputs().tab
    }

    /// Key the next replace search would use.
    pub fn key(&self) -> QueryKey {
        let inputs = self.inputs();
        QueryKey::new(inputs.tab, &inputs.effective_query, &inputs.author_id)
    }

    /// Whether there is anything to search for.
    pub fn can_search(&self) -> bool {
        self.key().is_searchable()
    }

    pub fn can_load_more(&self) -> bool {
        self.coordinator.can_load_more(&self.key())
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.coordinator.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.coordinator.subscribe()
    }

    /// Record a keystroke.  Searches once the input has been quiet for the
    /// debounce window; returns `None` if a newer keystroke took over first.
    pub async fn type_query(
        &self,
        raw: impl Into<String>,
    ) -> Option<Result<SearchOutcome, SearchError>> {
        let raw = raw.into();
        self.inputs().raw_query = raw.clone();

        let effective = self.debouncer.settle(&raw).await?;
        if self.inputs().effective_query == effective {
            debug!(query = %effective, "Effective query unchanged");
            return None;
        }
        self.inputs().effective_query = effective;
        Some(self.refresh().await)
    }

    /// Enter pressed: search the current input immediately.
    pub async fn submit(&self) -> Result<SearchOutcome, SearchError> {
        self.debouncer.cancel();
        {
            let mut inputs = self.inputs();
            inputs.effective_query = inputs.raw_query.trim().to_string();
        }
        self.refresh().await
    }

    pub async fn set_author(
        &self,
        author_id: impl Into<String>,
    ) -> Result<SearchOutcome, SearchError> {
        self.inputs().author_id = author_id.into().trim().to_string();
        self.refresh().await
    }

    /// Filter by the signed-in user.  `None` when the user is unknown.
    pub async fn use_current_user(&self) -> Option<Result<SearchOutcome, SearchError>> {
        let user_id = self.inputs().current_user_id.clone()?;
        Some(self.set_author(user_id).await)
    }

    /// Switch tabs.  A tab searched before with the same inputs is served
    /// from the cache.
    pub async fn select_tab(&self, tab: SearchTab) -> Result<SearchOutcome, SearchError> {
        self.inputs().tab = tab;
        self.refresh().await
    }

    /// Fetch the next page for the current key.
    pub async fn load_more(&self) -> Result<SearchOutcome, SearchError> {
        let key = self.key();
        self.coordinator
            .search(key.tab, &key.query, &key.author_id, AppendMode::Append)
            .await
    }

    /// Jump to a message from the visible results.
    pub fn open(&self, message_id: &MessageId) -> Result<JumpTarget, SearchError> {
        self.coordinator.open_message(self.navigator.as_ref(), message_id)
    }

    async fn refresh(&self) -> Result<SearchOutcome, SearchError> {
        let key = self.key();
        self.coordinator
            .search(key.tab, &key.query, &key.author_id, AppendMode::Replace)
            .await
    }

    fn inputs(&self) -> MutexGuard<'_, Inputs> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
