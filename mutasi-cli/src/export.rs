//! Presentation of parsed records: CSV file, JSON, or a terminal table.

use anyhow::{Context, Result};
use mutasi_ingest::{ParseReport, TransactionRecord};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: String,
    description: &'a str,
    kind: &'static str,
    amount: String,
    balance: String,
}

impl<'a> From<&'a TransactionRecord> for CsvRow<'a> {
    fn from(r: &'a TransactionRecord) -> Self {
        Self {
            date: format!("{}/{}", r.date_day_month, r.year),
            description: &r.description,
            kind: r.kind.as_str(),
            amount: format!("{:.2}", r.amount),
            balance: format!("{:.2}", r.balance),
        }
    }
}

/// Writes records as CSV with a `date,description,kind,amount,balance` header.
pub fn write_csv<W: Write>(writer: W, records: &[TransactionRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(CsvRow::from(r)).context("write csv row")?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

pub fn write_json<W: Write>(writer: W, report: &ParseReport) -> Result<()> {
    serde_json::to_writer_pretty(writer, report).context("serialize report")?;
    Ok(())
}

pub fn print_table(report: &ParseReport) {
    for r in &report.records {
        println!(
            "{}/{}  {:<16} {:>16.2} {:>16.2}  {}",
            r.date_day_month,
            r.year,
            r.kind.as_str(),
            r.amount,
            r.balance,
            r.description
        );
    }

    println!();
    for p in &report.pages {
        let how = match (p.skipped, p.strategy) {
            (true, _) => "skipped (disclaimer)".to_string(),
            (false, Some(s)) => s.as_str().to_string(),
            (false, None) => "no transactions recognized".to_string(),
        };
        println!("page {}: {} record(s), {}", p.page + 1, p.records, how);
    }
}
