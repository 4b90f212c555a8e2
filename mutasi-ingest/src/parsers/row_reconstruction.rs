//! Format B primary strategy: rebuild table rows from coordinates, then
//! assign column roles by content.
//!
//!   No  Tanggal      Keterangan       Mutasi           Saldo
//!   1   01 Jan 2025  TRANSFER MASUK   +1.000.000,00    5.000.000,00
//!   2   02 Jan 2025  QRIS TOKO ABC    -25.000,00       4.975.000,00
//!       10:15:32

use tracing::trace;

use super::{kind_from_sign, PageContext, Strategy, StatementParser};
use crate::grouping::{group_by_y, Bucketing, Row};
use crate::patterns::{
    is_debit_sign, is_integer, is_money_b, is_signed, is_timestamp, parse_long_date, parse_money_b,
};
use crate::types::{Token, TransactionRecord};

const ROW_TOLERANCE: f64 = 2.0;
const ROW_NUMBER_LABELS: &[&str] = &["no", "no."];
const DATE_LABELS: &[&str] = &["tanggal", "date"];

#[derive(Debug, Clone, Copy, Default)]
pub struct RowReconstructionParser;

impl StatementParser for RowReconstructionParser {
    fn strategy(&self) -> Strategy {
        Strategy::RowReconstruction
    }

    fn parse_page(&self, tokens: &[Token], _ctx: &PageContext) -> Vec<TransactionRecord> {
        let rows = group_by_y(tokens, Bucketing::Tolerance(ROW_TOLERANCE));
        let Some(header) = rows.iter().position(is_header_row) else {
            trace!("no table header row on page");
            return Vec::new();
        };

        rows[header + 1..].iter().filter_map(parse_row).collect()
    }
}

fn is_header_row(row: &Row<'_>) -> bool {
    let cells: Vec<String> = row.tokens.iter().map(|t| t.trimmed().to_lowercase()).collect();
    let has_number = cells.iter().any(|c| ROW_NUMBER_LABELS.contains(&c.as_str()));
    let has_date = cells.iter().any(|c| DATE_LABELS.iter().any(|l| c.contains(l)));
    has_number && has_date
}

fn parse_row(row: &Row<'_>) -> Option<TransactionRecord> {
    let first = row.first()?;
    if !is_integer(&first.text) {
        return None;
    }
    let cells = &row.tokens[1..];

    let Some((date_idx, (year, day_month))) = cells
        .iter()
        .enumerate()
        .find_map(|(i, t)| parse_long_date(&t.text).map(|d| (i, d)))
    else {
        trace!(row = first.trimmed(), "row without date cell");
        return None;
    };

    let decimals: Vec<usize> = (0..cells.len())
        .filter(|&i| i != date_idx && is_money_b(&cells[i].text))
        .collect();
    let amount_idx = decimals
        .iter()
        .copied()
        .find(|&i| is_signed(&cells[i].text))
        .or_else(|| decimals.first().copied())?;
    let Some(balance_idx) = decimals
        .iter()
        .copied()
        .filter(|&i| i != amount_idx)
        .max_by(|&a, &b| cells[a].x.total_cmp(&cells[b].x))
    else {
        trace!(row = first.trimmed(), "row without balance cell");
        return None;
    };

    let amount_text = &cells[amount_idx].text;
    let amount = parse_money_b(amount_text)?;
    let balance = parse_money_b(&cells[balance_idx].text)?;

    let mut rest: Vec<&Token> = cells
        .iter()
        .enumerate()
        .filter(|(i, t)| ![date_idx, amount_idx, balance_idx].contains(i) && !is_timestamp(&t.text))
        .map(|(_, t)| *t)
        .collect();
    rest.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));
    let description = rest.iter().map(|t| t.trimmed()).collect::<Vec<_>>().join(" ");

    Some(TransactionRecord {
        year,
        date_day_month: day_month,
        kind: kind_from_sign(is_debit_sign(amount_text), &description),
        description,
        amount: amount.abs(),
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;

    fn row(y: f64, cells: &[(&str, f64)]) -> Vec<Token> {
        cells.iter().map(|(s, x)| Token::new(*s, *x, y)).collect()
    }

    fn header(y: f64) -> Vec<Token> {
        row(
            y,
            &[
                ("No", 30.0),
                ("Tanggal", 60.0),
                ("Keterangan", 150.0),
                ("Mutasi", 350.0),
                ("Saldo", 450.0),
            ],
        )
    }

    fn ctx() -> PageContext {
        PageContext { year: 1999 }
    }

    #[test]
    fn test_credit_row() {
        let mut tokens = header(700.0);
        tokens.extend(row(
            680.0,
            &[
                ("1", 30.0),
                ("01 Jan 2025", 60.0),
                ("TRANSFER MASUK", 150.0),
                ("+1.000.000,00", 350.0),
                ("5.000.000,00", 450.0),
            ],
        ));

        let txns = RowReconstructionParser.parse_page(&tokens, &ctx());
        assert_eq!(txns.len(), 1);
        let t = &txns[0];
        assert_eq!(t.kind, TransactionKind::Credit);
        assert_eq!(t.amount, 1_000_000.0);
        assert_eq!(t.balance, 5_000_000.0);
        assert_eq!(t.description, "TRANSFER MASUK");
        assert_eq!(t.year, 2025);
        assert_eq!(t.date_day_month, "01/01");
    }

    #[test]
    fn test_debit_row_stores_magnitude_and_skips_timestamp() {
        let mut tokens = header(700.0);
        tokens.extend(row(
            680.0,
            &[
                ("2", 30.0),
                ("02 Jan 2025/2025", 60.0),
                ("QRIS", 150.0),
                ("-25.000,00", 350.0),
                ("4.975.000,00", 450.0),
            ],
        ));
        // wrapped second line of the description cell, plus the time column
        tokens.push(Token::new("TOKO ABC", 150.0, 679.0));
        tokens.push(Token::new("10:15:32", 60.0, 679.0));

        let txns = RowReconstructionParser.parse_page(&tokens, &ctx());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].kind, TransactionKind::Debit);
        assert_eq!(txns[0].amount, 25_000.0);
        assert_eq!(txns[0].description, "QRIS TOKO ABC");
        assert_eq!(txns[0].date_day_month, "02/01");
    }

    #[test]
    fn test_opening_balance_and_english_header() {
        let mut tokens = row(
            700.0,
            &[("No.", 30.0), ("Transaction Date", 60.0), ("Description", 150.0)],
        );
        tokens.extend(row(
            680.0,
            &[
                ("1", 30.0),
                ("01 Jan 2025", 60.0),
                ("Saldo Awal", 150.0),
                ("-0,00", 350.0),
                ("4.000.000,00", 450.0),
            ],
        ));

        let txns = RowReconstructionParser.parse_page(&tokens, &ctx());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].kind, TransactionKind::OpeningBalance);
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let mut tokens = header(700.0);
        // no balance
        tokens.extend(row(
            680.0,
            &[("1", 30.0), ("01 Jan 2025", 60.0), ("BIAYA", 150.0), ("-1.000,00", 350.0)],
        ));
        // no ordinal
        tokens.extend(row(
            660.0,
            &[("Total", 30.0), ("01 Jan 2025", 60.0), ("-1.000,00", 350.0), ("2.000,00", 450.0)],
        ));
        // no date
        tokens.extend(row(
            640.0,
            &[("3", 30.0), ("BUNGA", 150.0), ("+1.000,00", 350.0), ("3.000,00", 450.0)],
        ));
        tokens.extend(row(
            620.0,
            &[
                ("4", 30.0),
                ("03 Jan 2025", 60.0),
                ("BUNGA", 150.0),
                ("+1.000,00", 350.0),
                ("3.000,00", 450.0),
            ],
        ));

        let txns = RowReconstructionParser.parse_page(&tokens, &ctx());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date_day_month, "03/01");
    }

    #[test]
    fn test_rows_above_header_are_ignored() {
        let mut tokens = row(
            720.0,
            &[("9", 30.0), ("01 Jan 2025", 60.0), ("X", 150.0), ("+1,00", 350.0), ("2,00", 450.0)],
        );
        tokens.extend(header(700.0));
        let txns = RowReconstructionParser.parse_page(&tokens, &ctx());
        assert!(txns.is_empty());
    }

    #[test]
    fn test_without_header_yields_nothing() {
        let tokens = row(
            680.0,
            &[("1", 30.0), ("01 Jan 2025", 60.0), ("X", 150.0), ("+1,00", 350.0), ("2,00", 450.0)],
        );
        assert!(RowReconstructionParser.parse_page(&tokens, &ctx()).is_empty());
    }
}
