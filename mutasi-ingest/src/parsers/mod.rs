//! Parser strategies.
//!
//! Each strategy turns one page of positioned tokens into transaction
//! records. Strategies never fail: a page that does not fit their layout
//! yields an empty list and the orchestrator moves on to the next one.

pub mod direct_token;
pub mod pattern_line;
pub mod row_reconstruction;
pub mod sequential;

use serde::{Deserialize, Serialize};

use crate::types::{Token, TransactionKind, TransactionRecord};

pub use direct_token::DirectTokenParser;
pub use pattern_line::PatternLineParser;
pub use row_reconstruction::RowReconstructionParser;
pub use sequential::SequentialParser;

/// Phrase marking the statement's starting balance line.
pub const OPENING_BALANCE_PHRASE: &str = "saldo awal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Sequential,
    RowReconstruction,
    DirectToken,
    PatternLine,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::RowReconstruction => "row_reconstruction",
            Strategy::DirectToken => "direct_token",
            Strategy::PatternLine => "pattern_line",
        }
    }
}

/// Document-level facts a page parser may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext {
    /// Statement year for layouts whose dates omit it.
    pub year: i32,
}

pub trait StatementParser {
    fn strategy(&self) -> Strategy;

    fn parse_page(&self, tokens: &[Token], ctx: &PageContext) -> Vec<TransactionRecord>;
}

/// Kind for the signed-amount layouts: an opening-balance description wins
/// over the sign.
pub(crate) fn kind_from_sign(debit_sign: bool, description: &str) -> TransactionKind {
    if description.to_lowercase().contains(OPENING_BALANCE_PHRASE) {
        TransactionKind::OpeningBalance
    } else if debit_sign {
        TransactionKind::Debit
    } else {
        TransactionKind::Credit
    }
}
