use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Supported statement layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementFormat {
    /// Tokens arrive in reading order; fields follow a `DD/MM` date token.
    #[serde(rename = "a")]
    Sequential,
    /// Numbered table rows with `DD Mon YYYY` dates and signed amounts.
    #[serde(rename = "b")]
    Tabular,
}

/// A fragment of page text with its coordinates (PDF space, y grows upward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(alias = "str")]
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Token {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: None,
            height: None,
        }
    }

    /// Trimmed text content
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Debit,
    Credit,
    OpeningBalance,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Debit => "debit",
            TransactionKind::Credit => "credit",
            TransactionKind::OpeningBalance => "opening_balance",
        }
    }
}

/// Normalized output of every parser strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub year: i32,
    /// Always `DD/MM`
    pub date_day_month: String,
    pub description: String,
    pub kind: TransactionKind,
    /// Non-negative magnitude; the direction lives in `kind`.
    pub amount: f64,
    /// Running balance after the transaction, read from the statement.
    pub balance: f64,
}

impl TransactionRecord {
    /// Full calendar date, if `date_day_month` is a real day in `year`.
    pub fn date(&self) -> Option<NaiveDate> {
        let (d, m) = self.date_day_month.split_once('/')?;
        NaiveDate::from_ymd_opt(self.year, m.parse().ok()?, d.parse().ok()?)
    }

    /// Positive = money in, negative = money out.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Debit => -self.amount,
            TransactionKind::Credit | TransactionKind::OpeningBalance => self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: TransactionKind) -> TransactionRecord {
        TransactionRecord {
            year: 2025,
            date_day_month: "29/02".to_string(),
            description: "BIAYA ADM".to_string(),
            kind,
            amount: 15000.0,
            balance: 985000.0,
        }
    }

    #[test]
    fn test_signed_amount_follows_kind() {
        assert_eq!(record(TransactionKind::Debit).signed_amount(), -15000.0);
        assert_eq!(record(TransactionKind::Credit).signed_amount(), 15000.0);
        assert_eq!(record(TransactionKind::OpeningBalance).signed_amount(), 15000.0);
    }

    #[test]
    fn test_date_rejects_impossible_day() {
        // 2025 is not a leap year
        assert_eq!(record(TransactionKind::Credit).date(), None);

        let mut leap = record(TransactionKind::Credit);
        leap.year = 2024;
        assert_eq!(leap.date(), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_token_accepts_pdfjs_field_name() {
        let t: Token = serde_json::from_str(r#"{"str":"SALDO AWAL","x":10.5,"y":700}"#).unwrap();
        assert_eq!(t.text, "SALDO AWAL");
        assert_eq!(t.width, None);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionKind::OpeningBalance).unwrap();
        assert_eq!(json, "\"opening_balance\"");
    }
}
