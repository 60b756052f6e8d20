// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::models::Transaction;
use crate::prefs::Preferences;
use crate::session::Session;
use crate::store::FinanceStore;
use crate::utils::pretty_table;
use anyhow::{Context, Result};

/// One row per unusable field: `(issue, detail)`.
pub fn find_issues(transactions: &[Transaction]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for t in transactions {
        // 1) Amounts that count as zero in every total
        if t.amount_value().is_none() {
            rows.push(vec![
                "bad_amount".into(),
                format!("#{} '{}': amount '{}'", t.id, t.name, t.amount),
            ]);
        }
        // 2) Dates left out of the daily series
        if t.occurred_on().is_none() {
            rows.push(vec![
                "bad_date".into(),
                format!("#{} '{}': date '{}'", t.id, t.name, t.date),
            ]);
        }
    }
    rows
}

pub fn handle(store: &SqliteStore, session: &Session, prefs: &Preferences) -> Result<()> {
    let transactions = store
        .transactions(&session.owner_id)
        .context("Could not load transactions")?;
    let rows = find_issues(&transactions);

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(prefs.theme, &["Issue", "Detail"], rows));
    }
    Ok(())
}
