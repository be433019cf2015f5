//! # trawl-search
//!
//! Search-result aggregation and pagination engine.
//!
//! The crate turns a cursor-paginated, multi-tab message search API into a
//! de-duplicated, incrementally loadable result set per tab:
//! - [`request`] shapes the wire payload for one tab
//! - [`normalize`] parses an untrusted response body into a [`SearchResultPage`]
//! - [`aggregate`] folds pages into a [`TabState`]
//! - [`classify`] splits attachments into media and files
//! - [`coordinator`] caches results per query key and discards stale responses
//!
//! The network call and the host's jump-to-message primitive are injected
//! through the [`SearchBackend`] and [`Navigator`] traits.

pub mod aggregate;
pub mod backend;
pub mod cache;
pub mod classify;
pub mod coordinator;
pub mod navigate;
pub mod normalize;
pub mod request;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

mod error;

pub use aggregate::{file_items, media_items, AppendMode, AttachmentItem, TabState};
pub use backend::SearchBackend;
pub use cache::{QueryKey, SearchCache};
pub use classify::classify;
pub use coordinator::{SearchCoordinator, SearchOutcome, SearchSnapshot};
pub use error::{BackendError, SearchError};
pub use navigate::{JumpTarget, JumpType, Navigator};
pub use normalize::{normalize, SearchResultPage};
pub use request::{build, HasFilter, SearchRequest, TabQuery};
