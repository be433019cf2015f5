//! # trawl-shared
//!
//! Data model and wire constants shared by the search core and the client
//! shell: search tabs, messages, authors and attachments as they look after
//! a backend response has been normalized.

pub mod constants;
pub mod types;

pub use types::*;
