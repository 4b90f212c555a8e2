//! Page-by-page driver: pick the strategy chain for the statement format,
//! escalate through fallbacks, and stitch pages together in order.

use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::parsers::sequential::resolve_year;
use crate::parsers::{
    DirectTokenParser, PageContext, PatternLineParser, RowReconstructionParser, SequentialParser,
    StatementParser, Strategy,
};
use crate::source::{PageSlice, TokenSource};
use crate::types::{StatementFormat, Token, TransactionRecord};

const DISCLAIMER_MARKER: &str = "disclaimer";
const HEADER_WORDS: &[&str] = &["tanggal", "date", "keterangan", "description"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Year used when a Format A statement has no readable period label.
    pub fallback_year: i32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            fallback_year: chrono::Local::now().year(),
        }
    }
}

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub page: usize,
    /// Strategy that produced the records; `None` when every strategy came up empty.
    pub strategy: Option<Strategy>,
    pub records: usize,
    /// Trailing disclaimer page, not parsed.
    pub skipped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseReport {
    pub records: Vec<TransactionRecord>,
    pub pages: Vec<PageReport>,
}

/// Parsers tried, in order, on every page of the given format.
///
/// A line the pattern-line parser accepts always has its date and both
/// decimals on one baseline, so the direct-token parser recovers it first.
/// Inside this chain the last parser only runs on pages both others leave
/// empty, and then it yields nothing either.
pub fn strategy_chain(format: StatementFormat) -> Vec<Box<dyn StatementParser>> {
    match format {
        StatementFormat::Sequential => vec![Box::new(SequentialParser)],
        StatementFormat::Tabular => vec![
            Box::new(RowReconstructionParser),
            Box::new(DirectTokenParser),
            Box::new(PatternLineParser),
        ],
    }
}

/// Parse every page of `source`, in page order.
///
/// Only failures of the source itself are errors; pages or rows that do not
/// fit the layout contribute no records.
pub fn parse_document<S>(
    source: &mut S,
    format: StatementFormat,
    options: &ParseOptions,
) -> Result<ParseReport>
where
    S: TokenSource + ?Sized,
{
    let count = source.page_count();
    let chain = strategy_chain(format);
    let mut ctx = PageContext {
        year: options.fallback_year,
    };
    let mut report = ParseReport::default();

    for page in 0..count {
        let tokens = source.page(page)?;

        if page == 0 && format == StatementFormat::Sequential {
            ctx.year = match resolve_year(&tokens) {
                Some(year) => year,
                None => {
                    warn!(
                        year = options.fallback_year,
                        "statement period not found, using fallback year"
                    );
                    options.fallback_year
                }
            };
        }

        if page + 1 == count && is_disclaimer_page(&tokens) {
            debug!(page, "skipping trailing disclaimer page");
            report.pages.push(PageReport {
                page,
                strategy: None,
                records: 0,
                skipped: true,
            });
            continue;
        }

        let (strategy, records) = run_chain(&chain, &tokens, &ctx);
        debug!(
            page,
            strategy = strategy.map(|s| s.as_str()).unwrap_or("none"),
            records = records.len(),
            "parsed page"
        );
        report.pages.push(PageReport {
            page,
            strategy,
            records: records.len(),
            skipped: false,
        });
        report.records.extend(records);
    }

    info!(pages = count, records = report.records.len(), "statement parsed");
    Ok(report)
}

/// Convenience form over in-memory pages.
pub fn parse_pages(
    pages: &[Vec<Token>],
    format: StatementFormat,
    options: &ParseOptions,
) -> ParseReport {
    // every index below page_count() is served from memory
    parse_document(&mut PageSlice(pages), format, options).unwrap_or_default()
}

fn run_chain(
    chain: &[Box<dyn StatementParser>],
    tokens: &[Token],
    ctx: &PageContext,
) -> (Option<Strategy>, Vec<TransactionRecord>) {
    for parser in chain {
        let records = parser.parse_page(tokens, ctx);
        if !records.is_empty() {
            return (Some(parser.strategy()), records);
        }
        debug!(strategy = parser.strategy().as_str(), "no records, escalating");
    }
    (None, Vec::new())
}

/// A page of legal boilerplate: mentions a disclaimer and has no table header.
fn is_disclaimer_page(tokens: &[Token]) -> bool {
    let text = tokens
        .iter()
        .map(|t| t.trimmed().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    if !text.contains(DISCLAIMER_MARKER) {
        return false;
    }
    let has_header = text
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| HEADER_WORDS.contains(&word));
    !has_header
}
