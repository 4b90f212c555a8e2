//! Where page tokens come from.
//!
//! Decoding the statement document (and any password prompting it needs) is
//! the job of whatever implements [`TokenSource`]. The engine only asks for
//! pages in order and propagates the source's failures untouched.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::Token;

pub trait TokenSource {
    fn page_count(&self) -> usize;

    /// Tokens of the zero-based page `index`.
    fn page(&mut self, index: usize) -> Result<Vec<Token>>;
}

/// Borrowed in-memory pages.
#[derive(Debug, Clone, Copy)]
pub struct PageSlice<'a>(pub &'a [Vec<Token>]);

impl TokenSource for PageSlice<'_> {
    fn page_count(&self) -> usize {
        self.0.len()
    }

    fn page(&mut self, index: usize) -> Result<Vec<Token>> {
        self.0.get(index).cloned().ok_or(Error::PageOutOfRange {
            page: index,
            count: self.0.len(),
        })
    }
}

impl TokenSource for Vec<Vec<Token>> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page(&mut self, index: usize) -> Result<Vec<Token>> {
        PageSlice(self).page(index)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenDump {
    Wrapped { pages: Vec<Vec<Token>> },
    Bare(Vec<Vec<Token>>),
}

/// Reads a JSON token dump: `{"pages": [[token, ..], ..]}` or a bare
/// array of pages.
pub fn pages_from_json(json: &str) -> Result<Vec<Vec<Token>>> {
    let pages = match serde_json::from_str(json)? {
        TokenDump::Wrapped { pages } => pages,
        TokenDump::Bare(pages) => pages,
    };
    Ok(pages)
}
