//! Format B fallback: anchor on every date token and pick up whatever
//! numbers and words sit close to it vertically. No row grouping, so it
//! survives pages whose header row could not be found.

use tracing::trace;

use super::{kind_from_sign, PageContext, Strategy, StatementParser};
use crate::patterns::{
    is_debit_sign, is_integer, is_long_date, is_money_b, is_signed, is_timestamp, parse_long_date,
    parse_money_b, strip_trailing_number,
};
use crate::types::{Token, TransactionRecord};

/// Max |dy| for a number to belong to a date.
const AMOUNT_WINDOW: f64 = 20.0;
/// Max |dy| for a word to belong to a date; looser to catch wrapped text.
const DESCRIPTION_WINDOW: f64 = 25.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct DirectTokenParser;

impl StatementParser for DirectTokenParser {
    fn strategy(&self) -> Strategy {
        Strategy::DirectToken
    }

    fn parse_page(&self, tokens: &[Token], _ctx: &PageContext) -> Vec<TransactionRecord> {
        tokens
            .iter()
            .enumerate()
            .filter_map(|(i, t)| parse_long_date(&t.text).map(|d| (i, d)))
            .filter_map(|(i, (year, day_month))| record_near(tokens, i, year, day_month))
            .collect()
    }
}

fn record_near(
    tokens: &[Token],
    date_idx: usize,
    year: i32,
    day_month: String,
) -> Option<TransactionRecord> {
    let date = &tokens[date_idx];

    let numbers: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| is_money_b(&t.text) && (t.y - date.y).abs() < AMOUNT_WINDOW)
        .map(|(i, _)| i)
        .collect();
    if numbers.len() < 2 {
        trace!(date = date.trimmed(), found = numbers.len(), "not enough numbers near date");
        return None;
    }

    let balance_idx = numbers
        .iter()
        .copied()
        .max_by(|&a, &b| tokens[a].x.total_cmp(&tokens[b].x))?;
    let amount_idx = match numbers
        .iter()
        .copied()
        .find(|&i| i != balance_idx && is_signed(&tokens[i].text))
    {
        Some(i) => i,
        None => {
            let mut by_x = numbers.clone();
            by_x.sort_by(|&a, &b| tokens[a].x.total_cmp(&tokens[b].x));
            by_x[by_x.len() - 2]
        }
    };

    let amount_text = &tokens[amount_idx].text;
    let amount = parse_money_b(amount_text)?;
    let balance = parse_money_b(&tokens[balance_idx].text)?;

    let mut words: Vec<&Token> = tokens
        .iter()
        .enumerate()
        .filter(|&(i, t)| {
            i != date_idx
                && i != amount_idx
                && i != balance_idx
                && !t.is_blank()
                && (t.y - date.y).abs() < DESCRIPTION_WINDOW
                && !is_money_b(&t.text)
                && !is_timestamp(&t.text)
                && !is_long_date(&t.text)
                && !(is_integer(&t.text) && t.x < date.x)
        })
        .map(|(_, t)| t)
        .collect();
    words.sort_by(|a, b| a.x.total_cmp(&b.x));
    let joined = words.iter().map(|t| t.trimmed()).collect::<Vec<_>>().join(" ");
    let description = strip_trailing_number(&joined);

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

    fn ctx() -> PageContext {
        PageContext { year: 1999 }
    }

    #[test]
    fn test_recovers_rows_without_header() {
        let tokens = vec![
            Token::new("1", 30.0, 700.0),
            Token::new("01 Jan 2025", 60.0, 700.0),
            Token::new("TRANSFER MASUK", 150.0, 700.0),
            Token::new("+1.000.000,00", 350.0, 700.0),
            Token::new("5.000.000,00", 450.0, 700.0),
            Token::new("2", 30.0, 650.0),
            Token::new("02 Jan 2025", 60.0, 650.0),
            Token::new("TARIK TUNAI", 150.0, 650.0),
            Token::new("10:15", 60.0, 640.0),
            Token::new("-500.000,00", 350.0, 650.0),
            Token::new("4.500.000,00", 450.0, 650.0),
        ];

        let txns = DirectTokenParser.parse_page(&tokens, &ctx());
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].kind, TransactionKind::Credit);
        assert_eq!(txns[0].amount, 1_000_000.0);
        assert_eq!(txns[0].balance, 5_000_000.0);
        assert_eq!(txns[0].description, "TRANSFER MASUK");
        assert_eq!(txns[1].kind, TransactionKind::Debit);
        assert_eq!(txns[1].amount, 500_000.0);
        assert_eq!(txns[1].balance, 4_500_000.0);
        assert_eq!(txns[1].description, "TARIK TUNAI");
    }

    #[test]
    fn test_unsigned_amount_is_second_to_last_by_x() {
        let tokens = vec![
            Token::new("03 Feb 2025", 60.0, 500.0),
            Token::new("4.000.000,00", 450.0, 500.0),
            Token::new("250.000,00", 350.0, 501.0),
            Token::new("SETORAN", 150.0, 500.0),
            Token::new("77", 200.0, 500.0),
        ];

        let txns = DirectTokenParser.parse_page(&tokens, &ctx());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, 250_000.0);
        assert_eq!(txns[0].balance, 4_000_000.0);
        assert_eq!(txns[0].kind, TransactionKind::Credit);
        assert_eq!(txns[0].description, "SETORAN");
    }

    #[test]
    fn test_wrapped_line_feeds_description_but_not_amount() {
        let tokens = vec![
            Token::new("03 Feb 2025", 60.0, 500.0),
            Token::new("SETORAN", 150.0, 500.0),
            Token::new("250.000,00", 350.0, 501.0),
            Token::new("4.000.000,00", 450.0, 500.0),
            // 22 units below the date: inside the word window only
            Token::new("WRAPPED", 250.0, 478.0),
            Token::new("9.999,00", 300.0, 478.0),
        ];

        let txns = DirectTokenParser.parse_page(&tokens, &ctx());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, 250_000.0);
        assert_eq!(txns[0].balance, 4_000_000.0);
        assert_eq!(txns[0].description, "SETORAN WRAPPED");
    }

    #[test]
    fn test_date_with_single_number_is_skipped() {
        let tokens = vec![
            Token::new("03 Feb 2025", 60.0, 500.0),
            Token::new("4.000.000,00", 450.0, 500.0),
            Token::new("250.000,00", 350.0, 400.0),
        ];
        assert!(DirectTokenParser.parse_page(&tokens, &ctx()).is_empty());
    }
}
