//! Query cache and request coordination.
//!
//! Every network call is tagged with the generation that was current when it
//! was issued.  A response only commits (to the cache and to the visible
//! snapshot) if no newer generation has been issued in the meantime, so a
//! slow early response can never clobber a later one.  In-flight calls are
//! not aborted; their results are simply dropped on arrival.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use trawl_shared::{MessageId, SearchTab};

use crate::aggregate::{AppendMode, TabState};
use crate::backend::SearchBackend;
use crate::cache::{QueryKey, SearchCache};
use crate::error::SearchError;
use crate::navigate::{JumpTarget, Navigator};
use crate::normalize::normalize;
use crate::request::build;

// ---------------------------------------------------------------------------
// Snapshot & outcome
// ---------------------------------------------------------------------------

/// What the presentation layer should currently show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Key the results belong to; `None` when nothing is searchable.
    pub key: Option<QueryKey>,
    pub results: Arc<TabState>,
    pub loading: bool,
    pub error: Option<SearchError>,
    /// Generation of the last search that touched this snapshot.
    pub generation: u64,
}

/// How a call to [`SearchCoordinator::search`] was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A network call completed and its results were committed.
    Fetched(Arc<TabState>),
    /// Served from the cache without a network call.
    Cached(Arc<TabState>),
    /// Nothing to do: the key is not searchable or has no further pages.
    Skipped(Arc<TabState>),
    /// A newer search was issued before the response arrived; it was dropped.
    Superseded,
}

impl SearchOutcome {
    pub fn state(&self) -> Option<&Arc<TabState>> {
        match self {
            Self::Fetched(state) | Self::Cached(state) | Self::Skipped(state) => Some(state),
            Self::Superseded => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

struct Inner {
    cache: SearchCache,
    generation: u64,
}

/// Owns the cache for one search session and serializes commits by generation.
///
/// Each instance has its own cache; two sessions never share results.
pub struct SearchCoordinator<B> {
    backend: B,
    session: Uuid,
    inner: Mutex<Inner>,
    view: watch::Sender<SearchSnapshot>,
}

impl<B: SearchBackend> SearchCoordinator<B> {
    pub fn new(backend: B) -> Self {
        let (view, _) = watch::channel(SearchSnapshot::default());
        Self {
            backend,
            session: Uuid::new_v4(),
            inner: Mutex::new(Inner {
                cache: SearchCache::new(),
                generation: 0,
            }),
            view,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    /// Current visible state.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.view.borrow().clone()
    }

    /// Stream of visible states.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.view.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Cached results for a key, if a search for it has completed.
    pub fn cached(&self, key: &QueryKey) -> Option<Arc<TabState>> {
        self.lock().cache.get(key)
    }

    /// Whether a load-more for `key` would issue a request.
    pub fn can_load_more(&self, key: &QueryKey) -> bool {
        self.cached(key).is_some_and(|state| state.has_more())
    }

    /// Run a search for `(tab, query_text, author_id)`.
    ///
    /// `Replace` is served from the cache when the key has completed before;
    /// otherwise it fetches the first page.  `Append` always fetches the page
    /// after the cached cursor, and does nothing once the cursor is exhausted.
    /// A backend failure leaves the cache untouched and is reported both in
    /// the returned error and in the visible snapshot.
    pub async fn search(
        &self,
        tab: SearchTab,
        query_text: &str,
        author_id: &str,
        mode: AppendMode,
    ) -> Result<SearchOutcome, SearchError> {
        let key = QueryKey::new(tab, query_text, author_id);

        let (generation, request) = {
            let mut inner = self.lock();

            if !key.is_searchable() {
                inner.generation += 1;
                let empty = Arc::new(TabState::default());
                self.publish(SearchSnapshot {
                    key: None,
                    results: empty.clone(),
                    loading: false,
                    error: None,
                    generation: inner.generation,
                });
                return Ok(SearchOutcome::Skipped(empty));
            }

            let cursor = match mode {
                AppendMode::Replace => {
                    if let Some(cached) = inner.cache.get(&key) {
                        inner.generation += 1;
                        debug!(session = %self.session, %key, "Search served from cache");
                        self.publish(SearchSnapshot {
                            key: Some(key),
                            results: cached.clone(),
                            loading: false,
                            error: None,
                            generation: inner.generation,
                        });
                        return Ok(SearchOutcome::Cached(cached));
                    }
                    None
                }
                AppendMode::Append => {
                    let base = inner.cache.get(&key).unwrap_or_default();
                    match base.cursor.clone() {
                        Some(cursor) => Some(cursor),
                        None => {
                            debug!(session = %self.session, %key, "No further pages to load");
                            return Ok(SearchOutcome::Skipped(base));
                        }
                    }
                }
            };

            inner.generation += 1;
            let generation = inner.generation;

            let current = self.view.borrow().clone();
            let results = if current.key.as_ref() == Some(&key) {
                current.results
            } else {
                Arc::default()
            };
            self.publish(SearchSnapshot {
                key: Some(key.clone()),
                results,
                loading: true,
                error: None,
                generation,
            });

            (
                generation,
                build(key.tab, &key.query, &key.author_id, cursor.as_deref()),
            )
        };

        debug!(
            session = %self.session,
            generation,
            %key,
            ?mode,
            "Issuing search request"
        );

        let response = self.backend.post_search(&request).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(
                session = %self.session,
                generation,
                current = inner.generation,
                %key,
                "Discarding superseded search response"
            );
            return Ok(SearchOutcome::Superseded);
        }

        match response {
            Ok(body) => {
                let page = normalize(&body, key.tab);
                let base = match mode {
                    AppendMode::Replace => Arc::default(),
                    AppendMode::Append => inner.cache.get(&key).unwrap_or_default(),
                };
                let next = Arc::new(base.with_page(page, mode));
                inner.cache.store(key.clone(), next.clone());

                info!(
                    session = %self.session,
                    generation,
                    %key,
                    results = next.messages.len(),
                    has_more = next.has_more(),
                    "Search completed"
                );

                self.publish(SearchSnapshot {
                    key: Some(key),
                    results: next.clone(),
                    loading: false,
                    error: None,
                    generation,
                });
                Ok(SearchOutcome::Fetched(next))
            }
            Err(e) => {
                warn!(
                    session = %self.session,
                    generation,
                    %key,
                    error = %e,
                    "Search request failed"
                );
                let error = SearchError::from(e);
                self.view.send_modify(|snapshot| {
                    snapshot.loading = false;
                    snapshot.error = Some(error.clone());
                });
                Err(error)
            }
        }
    }

    /// Ask the host to open a message from the visible results.
    pub fn open_message(
        &self,
        navigator: &dyn Navigator,
        message_id: &MessageId,
    ) -> Result<JumpTarget, SearchError> {
        let target = {
            let snapshot = self.view.borrow();
            let message = snapshot
                .results
                .find(message_id)
                .ok_or_else(|| SearchError::UnknownMessage(message_id.clone()))?;
            JumpTarget::from(message)
        };

        info!(
            session = %self.session,
            channel = %target.channel_id,
            message = %target.message_id,
            "Jumping to message"
        );
        navigator.navigate(&target);
        Ok(target)
    }

    fn publish(&self, snapshot: SearchSnapshot) {
        self.view.send_replace(snapshot);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
