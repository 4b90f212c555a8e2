//! Coordinate clustering: turn a loose token stream into visual rows.

use std::collections::BTreeMap;

use crate::types::Token;

/// How y-coordinates are snapped before tokens are clustered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bucketing {
    /// `round(y / tolerance)`; tokens within roughly `tolerance` units share a row.
    Tolerance(f64),
    /// `round(y)`; only tokens on the same integer baseline share a line.
    Nearest,
}

impl Bucketing {
    fn key(&self, y: f64) -> i64 {
        match *self {
            Bucketing::Tolerance(tol) if tol > 0.0 => (y / tol).round() as i64,
            Bucketing::Tolerance(_) | Bucketing::Nearest => y.round() as i64,
        }
    }
}

/// One visual row, tokens ordered left to right.
#[derive(Debug, Clone)]
pub struct Row<'a> {
    pub key: i64,
    pub tokens: Vec<&'a Token>,
}

impl<'a> Row<'a> {
    pub fn first(&self) -> Option<&'a Token> {
        self.tokens.first().copied()
    }

    /// Row text joined with single spaces (used for header detection).
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.trimmed())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Groups tokens into rows ordered top to bottom (descending y).
///
/// Blank tokens are dropped; within a row tokens are sorted by ascending x.
pub fn group_by_y(tokens: &[Token], bucketing: Bucketing) -> Vec<Row<'_>> {
    let mut buckets: BTreeMap<i64, Vec<&Token>> = BTreeMap::new();
    for token in tokens.iter().filter(|t| !t.is_blank()) {
        buckets.entry(bucketing.key(token.y)).or_default().push(token);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(key, mut tokens)| {
            tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
            Row { key, tokens }
        })
        .collect()
}
