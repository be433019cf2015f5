//! `reqwest` implementation of the search call.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use trawl_search::{BackendError, SearchBackend, SearchRequest};
use trawl_shared::constants::SEARCH_PATH;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Posts search requests to the messaging backend's REST API.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: Client,
    url: Url,
}

impl HttpSearchBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let url = format!("{}{}", config.api_base.trim_end_matches('/'), SEARCH_PATH);
        let url = Url::parse(&url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.auth_token {
            let mut value = HeaderValue::from_str(token).map_err(|_| ClientError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn post_search(&self, request: &SearchRequest) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%status, url = %self.url, "Search response received");
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}
