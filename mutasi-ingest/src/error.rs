//! Error types for statement ingestion
//!
//! Layout misses never surface here: a page or row that does not match simply
//! yields no records. Only failures of the token source itself are errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Token source failed on page {page}: {message}")]
    Source { page: usize, message: String },

    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("Token dump is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
