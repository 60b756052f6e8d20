// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::models::Transaction;
use crate::session::Session;
use crate::store::FinanceStore;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::io::Write;

/// Exported row; field order is the column order.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub amount: &'a str,
    pub category: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub date: &'a str,
}

impl<'a> From<&'a Transaction> for ExportRow<'a> {
    fn from(t: &'a Transaction) -> Self {
        Self {
            name: &t.name,
            description: &t.description,
            amount: &t.amount,
            category: &t.category,
            kind: t.kind.as_str(),
            date: &t.date,
        }
    }
}

pub fn handle(store: &SqliteStore, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, session, sub),
        _ => Ok(()),
    }
}

pub fn write_csv<W: Write>(out: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    if transactions.is_empty() {
        wtr.write_record(["name", "description", "amount", "category", "type", "date"])?;
    }
    for t in transactions {
        wtr.serialize(ExportRow::from(t))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(out: W, transactions: &[Transaction]) -> Result<()> {
    let rows: Vec<ExportRow<'_>> = transactions.iter().map(ExportRow::from).collect();
    serde_json::to_writer_pretty(out, &rows)?;
    Ok(())
}

fn export_transactions(store: &SqliteStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").context("out missing")?;
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let transactions = store
        .transactions(&session.owner_id)
        .context("Could not load transactions")?;
    let file = std::fs::File::create(out).with_context(|| format!("Create {}", out))?;
    match fmt.as_str() {
        "csv" => write_csv(file, &transactions)?,
        _ => write_json(file, &transactions)?,
    }
    println!("Exported {} transactions to {}", transactions.len(), out);
    Ok(())
}
