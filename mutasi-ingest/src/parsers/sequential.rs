//! Format A: statements whose tokens arrive in reading order.
//!
//! Expected token stream after the header anchors:
//!   TANGGAL  KETERANGAN  CBG  MUTASI  SALDO
//!   01/01    SALDO AWAL                   1,000,000.00   1,000,000.00
//!   02/01    TARIKAN ATM  CBG  0938       50,000.00  DB  950,000.00
//!   03/01    TRSF E-BANKING CR  0301/FTSCY/WS95031  BUDI  250,000.00  1,200,000.00
//!
//! Each record is opened by a `DD/MM` token, then the first money token is
//! the mutation (debit when followed by `DB`) and the second is the balance.

use tracing::trace;

use super::{PageContext, Strategy, StatementParser, OPENING_BALANCE_PHRASE};
use crate::patterns::{find_year, is_day_month, parse_money_a};
use crate::types::{Token, TransactionKind, TransactionRecord};

const PERIOD_LABEL: &str = "PERIODE";
const DATE_HEADER: &str = "TANGGAL";
const DESCRIPTION_HEADER: &str = "KETERANGAN";
const BRANCH_MARKER: &str = "CBG";
const DEBIT_MARKER: &str = "DB";
const CONTINUATION_MARKER: &str = "BERSAMBUNG";

/// Max index distance between the date and description header labels.
const HEADER_WINDOW: usize = 4;
/// Tokens after the period label searched for the statement year.
const YEAR_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialParser;

impl StatementParser for SequentialParser {
    fn strategy(&self) -> Strategy {
        Strategy::Sequential
    }

    fn parse_page(&self, tokens: &[Token], ctx: &PageContext) -> Vec<TransactionRecord> {
        let tokens: Vec<&Token> = tokens.iter().filter(|t| !t.is_blank()).collect();

        if find_period_label(&tokens).is_none() {
            trace!("no period label on page");
            return Vec::new();
        }
        let Some(header_end) = find_header(&tokens) else {
            trace!("no date/description header on page");
            return Vec::new();
        };

        scan_transactions(&tokens, header_end + 1, ctx.year)
    }
}

/// Statement year from the period label, if the page carries one.
pub fn resolve_year(tokens: &[Token]) -> Option<i32> {
    let tokens: Vec<&Token> = tokens.iter().filter(|t| !t.is_blank()).collect();
    let start = find_period_label(&tokens)?;
    tokens
        .iter()
        .skip(start)
        .take(YEAR_WINDOW + 1)
        .find_map(|t| find_year(&t.text))
}

fn upper(t: &Token) -> String {
    t.trimmed().to_uppercase()
}

fn find_period_label(tokens: &[&Token]) -> Option<usize> {
    tokens.iter().position(|t| upper(t).starts_with(PERIOD_LABEL))
}

/// Index of the later of the two header labels.
fn find_header(tokens: &[&Token]) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| upper(t) == DATE_HEADER)
        .find_map(|(i, _)| {
            let lo = i.saturating_sub(HEADER_WINDOW);
            let hi = (i + HEADER_WINDOW).min(tokens.len().saturating_sub(1));
            (lo..=hi)
                .find(|&j| upper(tokens[j]) == DESCRIPTION_HEADER)
                .map(|j| i.max(j))
        })
}

fn is_terminator(t: &Token) -> bool {
    let text = upper(t);
    text.contains(&OPENING_BALANCE_PHRASE.to_uppercase()) || text.starts_with(CONTINUATION_MARKER)
}

/// A record under construction.
struct Draft<'a> {
    date: &'a str,
    fragments: Vec<&'a str>,
    amount: Option<(f64, TransactionKind)>,
    balance: Option<f64>,
}

impl Draft<'_> {
    fn finish(self, year: i32) -> Option<TransactionRecord> {
        let (amount, mut kind) = self.amount?;
        let Some(balance) = self.balance else {
            trace!(date = self.date, "dropping record without balance");
            return None;
        };
        let description = self
            .fragments
            .iter()
            .flat_map(|f| f.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");
        if description.eq_ignore_ascii_case(OPENING_BALANCE_PHRASE) {
            kind = TransactionKind::OpeningBalance;
        }
        Some(TransactionRecord {
            year,
            date_day_month: self.date.to_string(),
            description,
            kind,
            amount,
            balance,
        })
    }
}

fn scan_transactions(tokens: &[&Token], start: usize, year: i32) -> Vec<TransactionRecord> {
    let mut out = Vec::new();
    let mut i = start;

    while i < tokens.len() {
        let tok = tokens[i];
        if !is_day_month(&tok.text) {
            if is_terminator(tok) {
                break;
            }
            i += 1;
            continue;
        }

        let mut draft = Draft {
            date: tok.trimmed(),
            fragments: Vec::new(),
            amount: None,
            balance: None,
        };
        i += 1;

        if let Some(next) = tokens.get(i) {
            if !is_day_month(&next.text) && parse_money_a(&next.text).is_none() {
                draft.fragments.push(next.trimmed());
                i += 1;
            }
        }
        if tokens.get(i).is_some_and(|t| upper(t) == BRANCH_MARKER) {
            i += 2;
        }

        let mut page_done = false;
        while i < tokens.len() {
            let tok = tokens[i];
            if is_day_month(&tok.text) {
                break;
            }
            if let Some(value) = parse_money_a(&tok.text) {
                if draft.amount.is_none() {
                    let debit = tokens.get(i + 1).is_some_and(|t| upper(t) == DEBIT_MARKER);
                    if debit {
                        draft.amount = Some((value, TransactionKind::Debit));
                        i += 2;
                    } else {
                        draft.amount = Some((value, TransactionKind::Credit));
                        i += 1;
                    }
                    continue;
                }
                draft.balance = Some(value);
                i += 1;
                break;
            }
            if is_terminator(tok) {
                page_done = true;
                break;
            }
            draft.fragments.push(tok.trimmed());
            i += 1;
        }

        out.extend(draft.finish(year));
        if page_done {
            break;
        }
    }

    out
}
