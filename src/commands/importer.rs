// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::models::{parse_amount, parse_day, NewTransaction, TxKind};
use crate::session::Session;
use crate::store::FinanceStore;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use tracing::{error, warn};

/// Category used for imported rows that do not name one.
pub const DEFAULT_IMPORT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingName,
    MissingAmount,
    MissingDate,
    InvalidAmount(String),
    InvalidDate(String),
    UnknownType(String),
    /// The row's bytes are not valid UTF-8.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportRow {
    Valid(NewTransaction),
    Skipped { line: u64, reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub fn handle(store: &mut SqliteStore, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(store, session, sub),
        _ => Ok(()),
    }
}

fn import_transactions(
    store: &mut SqliteStore,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let path = sub.get_one::<String>("path").context("path missing")?.trim();
    let file = File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let rows = read_rows(file).with_context(|| format!("Read CSV {}", path))?;
    let report = import_rows(store, &session.owner_id, rows);
    println!(
        "Imported {} transactions from {} ({} skipped, {} failed)",
        report.imported, path, report.skipped, report.failed
    );
    Ok(())
}

/// Column positions by lower-cased header name.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        Self(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.trim().to_lowercase(), i))
                .collect(),
        )
    }

    fn get<'r>(&self, rec: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.0
            .get(name)
            .and_then(|&i| rec.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Classifies every data row of a header-based CSV.
pub fn read_rows<R: Read>(input: R) -> Result<Vec<ImportRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let columns = Columns::new(rdr.headers()?);

    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let raw = result?;
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let classified = StringRecord::from_byte_record(raw)
            .map_err(|e| SkipReason::Unreadable(e.utf8_error().to_string()))
            .and_then(|rec| classify(&columns, &rec));
        rows.push(match classified {
            Ok(new) => ImportRow::Valid(new),
            Err(reason) => ImportRow::Skipped { line, reason },
        });
    }
    Ok(rows)
}

fn classify(columns: &Columns, rec: &StringRecord) -> Result<NewTransaction, SkipReason> {
    let name = columns.get(rec, "name").ok_or(SkipReason::MissingName)?;
    let amount_raw = columns.get(rec, "amount").ok_or(SkipReason::MissingAmount)?;
    let date_raw = columns.get(rec, "date").ok_or(SkipReason::MissingDate)?;

    let amount = parse_amount(amount_raw)
        .filter(|d| *d > Decimal::ZERO)
        .ok_or_else(|| SkipReason::InvalidAmount(amount_raw.to_string()))?;
    let date = parse_day(date_raw).ok_or_else(|| SkipReason::InvalidDate(date_raw.to_string()))?;
    let kind = match columns.get(rec, "type") {
        Some(t) => t
            .parse::<TxKind>()
            .map_err(|_| SkipReason::UnknownType(t.to_string()))?,
        None => TxKind::Expense,
    };

    Ok(NewTransaction {
        kind,
        name: name.to_string(),
        description: columns.get(rec, "description").unwrap_or_default().to_string(),
        category: columns
            .get(rec, "category")
            .unwrap_or(DEFAULT_IMPORT_CATEGORY)
            .to_string(),
        amount: amount.to_string(),
        date: date.to_string(),
    })
}

/// Creates one transaction per valid row. A row the store rejects is counted
/// as failed and the batch carries on.
pub fn import_rows<S: FinanceStore + ?Sized>(
    store: &mut S,
    owner: &str,
    rows: Vec<ImportRow>,
) -> ImportReport {
    let mut report = ImportReport::default();
    for row in rows {
        match row {
            ImportRow::Valid(new) => match store.create_transaction(owner, &new) {
                Ok(_) => report.imported += 1,
                Err(e) => {
                    error!(owner, name = %new.name, "import row failed: {e}");
                    report.failed += 1;
                }
            },
            ImportRow::Skipped { line, reason } => {
                warn!(line, ?reason, "skipping import row");
                report.skipped += 1;
            }
        }
    }
    report
}
