// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use spendwise::commands::importer::{self, ImportRow, SkipReason};
use spendwise::db::SqliteStore;
use spendwise::error::StoreError;
use spendwise::models::{Budget, NewTransaction, Transaction, TransactionPatch, TxKind};
use spendwise::session::Session;
use spendwise::store::FinanceStore;
use spendwise::cli;
use std::io::Write;
use tempfile::NamedTempFile;

fn valid(rows: &[ImportRow]) -> Vec<&NewTransaction> {
    rows.iter()
        .filter_map(|r| match r {
            ImportRow::Valid(new) => Some(new),
            ImportRow::Skipped { .. } => None,
        })
        .collect()
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut store = SqliteStore::open_in_memory().unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name,description,amount,category,type,date\nShop,,5.00,Groceries,expense,2025-02-03"
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    let matches =
        cli::build_cli().get_matches_from(["spendwise", "import", "transactions", "--path", &padded]);
    let session = Session {
        owner_id: "alice".into(),
    };
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(&mut store, &session, import_m).unwrap();
    } else {
        panic!("no import subcommand");
    }

    let all = store.transactions("alice").unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].amount, "5.00");
    assert_eq!(all[0].date, "2025-02-03");
}

#[test]
fn missing_type_and_category_fall_back_to_defaults() {
    let csv = "Name,Amount,Date\nBakery,3.20,2025-02-01\n";
    let rows = importer::read_rows(csv.as_bytes()).unwrap();
    let rows = valid(&rows);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, TxKind::Expense);
    assert_eq!(rows[0].category, importer::DEFAULT_IMPORT_CATEGORY);
    assert_eq!(rows[0].description, "");
}

#[test]
fn columns_are_found_by_header_name() {
    let csv = "date,type,amount,name,category\n2025-01-31T08:00:00Z,INCOME,1500,Payroll,Salary\n";
    let rows = importer::read_rows(csv.as_bytes()).unwrap();
    let rows = valid(&rows);
    assert_eq!(rows[0].kind, TxKind::Income);
    assert_eq!(rows[0].name, "Payroll");
    assert_eq!(rows[0].category, "Salary");
    assert_eq!(rows[0].date, "2025-01-31");
}

#[test]
fn bad_rows_are_skipped_with_reason() {
    let csv = "\
name,amount,date,type
,4,2025-01-01,expense
Tea,,2025-01-01,expense
Tea,abc,2025-01-01,expense
Tea,0,2025-01-01,expense
Tea,4,01/02/2025,expense
Tea,4,2025-01-01,transfer
Tea,4,2025-01-01,expense
";
    let rows = importer::read_rows(csv.as_bytes()).unwrap();
    let reasons: Vec<SkipReason> = rows
        .iter()
        .filter_map(|r| match r {
            ImportRow::Skipped { reason, .. } => Some(reason.clone()),
            ImportRow::Valid(_) => None,
        })
        .collect();
    assert_eq!(
        reasons,
        vec![
            SkipReason::MissingName,
            SkipReason::MissingAmount,
            SkipReason::InvalidAmount("abc".into()),
            SkipReason::InvalidAmount("0".into()),
            SkipReason::InvalidDate("01/02/2025".into()),
            SkipReason::UnknownType("transfer".into()),
        ]
    );
    assert_eq!(valid(&rows).len(), 1);

    let mut store = SqliteStore::open_in_memory().unwrap();
    let report = importer::import_rows(&mut store, "alice", rows);
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 6);
    assert_eq!(report.failed, 0);
}

#[test]
fn skipped_rows_report_their_line() {
    let csv = "name,amount,date\nA,1,2025-01-01\nB,x,2025-01-01\n";
    let rows = importer::read_rows(csv.as_bytes()).unwrap();
    match &rows[1] {
        ImportRow::Skipped { line, .. } => assert_eq!(*line, 3),
        other => panic!("expected a skipped row, got {:?}", other),
    }
}

/// Accepts the first `allow` inserts and rejects the rest.
struct CappedStore {
    inner: SqliteStore,
    allow: usize,
}

impl FinanceStore for CappedStore {
    fn create_transaction(
        &mut self,
        owner: &str,
        new: &NewTransaction,
    ) -> Result<Transaction, StoreError> {
        if self.allow == 0 {
            return Err(StoreError::Rejected("quota exceeded".into()));
        }
        self.allow -= 1;
        self.inner.create_transaction(owner, new)
    }

    fn update_transaction(
        &mut self,
        owner: &str,
        id: i64,
        patch: &TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        self.inner.update_transaction(owner, id, patch)
    }

    fn delete_transaction(&mut self, owner: &str, id: i64) -> Result<(), StoreError> {
        self.inner.delete_transaction(owner, id)
    }

    fn upsert_budget(
        &mut self,
        owner: &str,
        category: &str,
        limit: Decimal,
    ) -> Result<Budget, StoreError> {
        self.inner.upsert_budget(owner, category, limit)
    }

    fn transactions(&self, owner: &str) -> Result<Vec<Transaction>, StoreError> {
        self.inner.transactions(owner)
    }

    fn budgets(&self, owner: &str) -> Result<Vec<Budget>, StoreError> {
        self.inner.budgets(owner)
    }
}

#[test]
fn store_failures_are_counted_and_batch_continues() {
    let csv = "name,amount,date\nA,1,2025-01-01\nB,2,2025-01-02\nC,3,2025-01-03\n";
    let rows = importer::read_rows(csv.as_bytes()).unwrap();
    let mut store = CappedStore {
        inner: SqliteStore::open_in_memory().unwrap(),
        allow: 2,
    };
    let report = importer::import_rows(&mut store, "alice", rows);
    assert_eq!(report.imported, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(store.transactions("alice").unwrap().len(), 2);
}

#[test]
fn undecodable_row_is_skipped_and_neighbours_import() {
    let csv: &[u8] = b"name,amount,date\nTea,3,2024-01-01\nCaf\xff,4,2024-01-02\nRent,900,2024-01-03\n";
    let rows = importer::read_rows(csv).unwrap();
    assert_eq!(valid(&rows).len(), 2);
    match &rows[1] {
        ImportRow::Skipped {
            line,
            reason: SkipReason::Unreadable(_),
        } => assert_eq!(*line, 3),
        other => panic!("expected an unreadable row, got {:?}", other),
    }

    let mut store = SqliteStore::open_in_memory().unwrap();
    let report = importer::import_rows(&mut store, "alice", rows);
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 1);
    let names: Vec<String> = store
        .transactions("alice")
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Rent".to_string(), "Tea".to_string()]);
}
