//! mutasi-ingest: turn positioned statement text into transaction records.
//!
//! Pages arrive as loose streams of text fragments with coordinates. Format A
//! statements are read in token order; Format B statements are rebuilt into
//! table rows, with two less structured fallbacks for pages where that fails.

pub mod error;
pub mod grouping;
pub mod orchestrator;
pub mod parsers;
pub mod patterns;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use grouping::{group_by_y, Bucketing, Row};
pub use orchestrator::{
    parse_document, parse_pages, strategy_chain, PageReport, ParseOptions, ParseReport,
};
pub use parsers::{PageContext, StatementParser, Strategy};
pub use source::{pages_from_json, PageSlice, TokenSource};
pub use types::{StatementFormat, Token, TransactionKind, TransactionRecord};
