//! Host collaborator that performs the search call.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendError;
use crate::request::SearchRequest;

/// Issues a search request against the messaging backend.
///
/// The returned body is untrusted; it is handed to
/// [`normalize`](crate::normalize::normalize) as-is.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn post_search(&self, request: &SearchRequest) -> Result<Value, BackendError>;
}

#[async_trait]
impl<T: SearchBackend + ?Sized> SearchBackend for std::sync::Arc<T> {
    async fn post_search(&self, request: &SearchRequest) -> Result<Value, BackendError> {
        (**self).post_search(request).await
    }
}
