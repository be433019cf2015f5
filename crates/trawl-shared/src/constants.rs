/// REST path of the multi-tab message search endpoint
pub const SEARCH_PATH: &str = "/users/@me/messages/search/tabs";

/// Results requested per page, per tab
pub const PAGE_SIZE: u32 = 25;

/// Sort field sent with every search (most recent first)
pub const SORT_BY: &str = "timestamp";
pub const SORT_ORDER: &str = "desc";

/// Default debounce window for typed queries, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 350;

/// Filename extensions treated as images when no content type is declared
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Filename extensions treated as videos when no content type is declared
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Placeholder author used when a result carries no usable author object
pub const UNKNOWN_USER_ID: &str = "0";
pub const UNKNOWN_USERNAME: &str = "Unknown User";

/// User-facing text for a failed search
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed. Please try again.";
