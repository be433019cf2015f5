use thiserror::Error;

use trawl_shared::constants::SEARCH_FAILED_MESSAGE;
use trawl_shared::MessageId;

/// Failure reported by a [`SearchBackend`](crate::SearchBackend) call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced a response (connect, timeout, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Backend responded with status {status}")]
    Status { status: u16 },

    /// The response body was not JSON.
    #[error("Undecodable response body: {0}")]
    Decode(String),
}

/// Errors surfaced at the coordinator boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The search call failed.  Retry by issuing the search again.
    #[error("Search failed: {0}")]
    Backend(#[from] BackendError),

    /// Navigation was requested for a message that is not in the visible results.
    #[error("Message {0} is not part of the current results")]
    UnknownMessage(MessageId),
}

impl SearchError {
    /// Text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(_) => SEARCH_FAILED_MESSAGE.to_string(),
            Self::UnknownMessage(_) => self.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}
