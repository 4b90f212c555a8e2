//! Format B last resort: exact-baseline lines read by column position.

use super::{kind_from_sign, PageContext, Strategy, StatementParser};
use crate::grouping::{group_by_y, Bucketing, Row};
use crate::patterns::{
    is_debit_sign, is_integer, is_money_b, is_timestamp, parse_long_date, parse_money_b,
};
use crate::types::{Token, TransactionRecord};

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternLineParser;

impl StatementParser for PatternLineParser {
    fn strategy(&self) -> Strategy {
        Strategy::PatternLine
    }

    fn parse_page(&self, tokens: &[Token], _ctx: &PageContext) -> Vec<TransactionRecord> {
        group_by_y(tokens, Bucketing::Nearest)
            .iter()
            .filter_map(parse_line)
            .collect()
    }
}

fn parse_line(line: &Row<'_>) -> Option<TransactionRecord> {
    if !is_integer(&line.first()?.text) {
        return None;
    }
    let (date, (year, day_month)) = line
        .tokens
        .iter()
        .find_map(|t| parse_long_date(&t.text).map(|d| (*t, d)))?;

    let decimals: Vec<&Token> = line
        .tokens
        .iter()
        .copied()
        .filter(|t| is_money_b(&t.text))
        .collect();
    let [.., amount_tok, balance_tok] = decimals.as_slice() else {
        return None;
    };
    let amount = parse_money_b(&amount_tok.text)?;
    let balance = parse_money_b(&balance_tok.text)?;

    let description = line
        .tokens
        .iter()
        .filter(|t| t.x > date.x && t.x < amount_tok.x && !is_timestamp(&t.text))
        .map(|t| t.trimmed())
        .collect::<Vec<_>>()
        .join(" ");

    Some(TransactionRecord {
        year,
        date_day_month: day_month,
        kind: kind_from_sign(is_debit_sign(&amount_tok.text), &description),
        description,
        amount: amount.abs(),
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;

    fn line(y: f64, cells: &[(&str, f64)]) -> Vec<Token> {
        cells.iter().map(|(s, x)| Token::new(*s, *x, y)).collect()
    }

    #[test]
    fn test_reads_columns_by_position() {
        let mut tokens = line(
            600.2,
            &[
                ("7", 30.0),
                ("09 Mar 2025", 60.0),
                ("08:30", 120.0),
                ("BAYAR", 150.0),
                ("LISTRIK", 200.0),
                ("-300.000,00", 350.0),
                ("1.700.000,00", 450.0),
            ],
        );
        // a line that is not a table row
        tokens.extend(line(580.0, &[("Halaman", 30.0), ("1", 60.0)]));

        let txns = PatternLineParser.parse_page(&tokens, &PageContext { year: 1999 });
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "BAYAR LISTRIK");
        assert_eq!(txns[0].kind, TransactionKind::Debit);
        assert_eq!(txns[0].amount, 300_000.0);
        assert_eq!(txns[0].balance, 1_700_000.0);
        assert_eq!(txns[0].date_day_month, "09/03");
    }

    #[test]
    fn test_line_needs_two_decimals() {
        let tokens = line(
            600.0,
            &[("7", 30.0), ("09 Mar 2025", 60.0), ("X", 150.0), ("1.700.000,00", 450.0)],
        );
        assert!(PatternLineParser.parse_page(&tokens, &PageContext { year: 1999 }).is_empty());
    }
}
