use thiserror::Error;

/// Errors raised while setting up the client shell.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The configured base URL cannot be used.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The auth token contains characters not allowed in a header.
    #[error("Invalid auth token")]
    InvalidToken,

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
