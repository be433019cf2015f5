//! Debounced effective query.
//!
//! Each call to [`QueryDebouncer::settle`] supersedes every earlier one.  Only
//! the input that is still the latest after the quiet period becomes the
//! effective query.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct QueryDebouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl QueryDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    /// Wait out the quiet period for `raw`.  Returns the trimmed text, or
    /// `None` if newer input arrived (or [`cancel`](Self::cancel) was called)
    /// in the meantime.
    pub async fn settle(&self, raw: &str) -> Option<String> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.latest.load(Ordering::SeqCst) == ticket).then(|| raw.trim().to_string())
    }

    /// Drop any pending input.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
