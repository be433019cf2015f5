//! # trawl-client
//!
//! Host-facing shell around the search engine: the HTTP search backend,
//! environment configuration, logging bootstrap, the query debouncer and
//! [`SearchSession`], which maps user input events onto a
//! [`SearchCoordinator`](trawl_search::SearchCoordinator).

pub mod config;
pub mod debounce;
pub mod http;
pub mod session;

mod error;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};

use trawl_search::Navigator;

pub use config::ClientConfig;
pub use debounce::QueryDebouncer;
pub use error::ClientError;
pub use http::HttpSearchBackend;
pub use session::SearchSession;

/// Install the global `tracing` subscriber.  `RUST_LOG` overrides the
/// default filter.  Calling this twice is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trawl_client=debug,trawl_search=debug,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Open a session against the backend configured in the environment.
pub fn open_session(
    navigator: Arc<dyn Navigator>,
) -> anyhow::Result<SearchSession<HttpSearchBackend>> {
    let config = ClientConfig::from_env();
    let backend = HttpSearchBackend::new(&config)
        .with_context(|| format!("Failed to set up search backend for {}", config.api_base))?;

    tracing::info!(
        url = %backend.url(),
        debounce_ms = config.debounce.as_millis() as u64,
        "Search session opened"
    );
    Ok(SearchSession::new(backend, navigator, &config))
}
