// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::StoreError;
use crate::models::{normalize_category, Budget, NewTransaction, Transaction, TransactionPatch, TxKind};
use crate::store::FinanceStore;
use crate::subscription::{SnapshotEvent, SnapshotHub, Subscription};
use crate::undo::PendingUndo;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendwise", "spendwise"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendwise.sqlite"))
}

/// The database file to use: an explicit path (from `--db`/`SPENDWISE_DB`) or
/// the platform data dir.
pub fn resolve_db_path(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(p) => Ok(PathBuf::from(p)),
        None => db_path(),
    }
}

pub fn open_or_init(path: &Path) -> Result<SqliteStore> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    SqliteStore::new(conn).with_context(|| format!("Initialize schema at {}", path.display()))
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions(owner_id, date);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        category TEXT NOT NULL,
        limit_amount TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE(owner_id, category)
    );

    -- at most one restorable delete per user; payload is a serialized PendingUndo
    CREATE TABLE IF NOT EXISTS pending_undo(
        owner_id TEXT PRIMARY KEY,
        payload TEXT NOT NULL
    );
    "#,
    )
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

const TX_COLUMNS: &str = "id, owner_id, kind, name, description, category, amount, date, created_at";

type RawTransaction = (i64, String, String, String, String, String, String, String, String);

fn raw_transaction(r: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
    ))
}

fn to_transaction(raw: RawTransaction) -> Result<Transaction, StoreError> {
    let (id, owner_id, kind, name, description, category, amount, date, created_at) = raw;
    let kind = kind
        .parse::<TxKind>()
        .map_err(|e| StoreError::Corrupt(format!("transaction {}: {}", id, e)))?;
    Ok(Transaction {
        id,
        owner_id,
        kind,
        name,
        description,
        category,
        amount,
        date,
        created_at,
    })
}

/// SQLite-backed [`FinanceStore`] that pushes a fresh snapshot to its
/// [`SnapshotHub`] after every successful mutation.
pub struct SqliteStore {
    conn: Connection,
    hub: SnapshotHub,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> rusqlite::Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn,
            hub: SnapshotHub::new(),
        })
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn hub(&self) -> &SnapshotHub {
        &self.hub
    }

    /// Register for `owner`'s snapshots. The current snapshots are queued on
    /// the new subscription straight away.
    pub fn subscribe(&self, owner: &str) -> Result<Subscription, StoreError> {
        let initial = vec![
            SnapshotEvent::Transactions(self.transactions(owner)?),
            SnapshotEvent::Budgets(self.budgets(owner)?),
        ];
        Ok(self.hub.subscribe_with(owner, initial))
    }

    fn notify_transactions(&self, owner: &str) {
        if self.hub.subscriber_count(owner) == 0 {
            return;
        }
        match self.transactions(owner) {
            Ok(snapshot) => self.hub.publish_transactions(owner, &snapshot),
            Err(e) => error!(owner, "could not read transaction snapshot: {e}"),
        }
    }

    fn notify_budgets(&self, owner: &str) {
        if self.hub.subscriber_count(owner) == 0 {
            return;
        }
        match self.budgets(owner) {
            Ok(snapshot) => self.hub.publish_budgets(owner, &snapshot),
            Err(e) => error!(owner, "could not read budget snapshot: {e}"),
        }
    }

    fn transaction(&self, owner: &str, id: i64) -> Result<Transaction, StoreError> {
        let sql = format!("SELECT {} FROM transactions WHERE id=?1 AND owner_id=?2", TX_COLUMNS);
        let raw = self
            .conn
            .query_row(&sql, params![id, owner], raw_transaction)
            .optional()?
            .ok_or(StoreError::NotFound(id))?;
        to_transaction(raw)
    }

    pub fn load_pending_undo(&self, owner: &str) -> Result<Option<PendingUndo>, StoreError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM pending_undo WHERE owner_id=?1",
                params![owner],
                |r| r.get(0),
            )
            .optional()?;
        payload
            .map(|p| {
                serde_json::from_str(&p)
                    .map_err(|e| StoreError::Corrupt(format!("pending undo for {}: {}", owner, e)))
            })
            .transpose()
    }

    pub fn save_pending_undo(
        &self,
        owner: &str,
        pending: Option<&PendingUndo>,
    ) -> Result<(), StoreError> {
        match pending {
            Some(p) => {
                let payload = serde_json::to_string(p)
                    .map_err(|e| StoreError::Rejected(format!("pending undo: {}", e)))?;
                self.conn.execute(
                    "INSERT INTO pending_undo(owner_id, payload) VALUES (?1, ?2)
                     ON CONFLICT(owner_id) DO UPDATE SET payload=excluded.payload",
                    params![owner, payload],
                )?;
            }
            None => {
                self.conn
                    .execute("DELETE FROM pending_undo WHERE owner_id=?1", params![owner])?;
            }
        }
        Ok(())
    }
}

impl FinanceStore for SqliteStore {
    fn create_transaction(
        &mut self,
        owner: &str,
        new: &NewTransaction,
    ) -> Result<Transaction, StoreError> {
        self.conn.execute(
            "INSERT INTO transactions(owner_id, kind, name, description, category, amount, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                owner,
                new.kind.as_str(),
                new.name,
                new.description,
                new.category,
                new.amount,
                new.date,
                now_stamp()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(owner, id, kind = %new.kind, "created transaction");
        self.notify_transactions(owner);
        self.transaction(owner, id)
    }

    fn update_transaction(
        &mut self,
        owner: &str,
        id: i64,
        patch: &TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        let existing = self.transaction(owner, id)?;
        if patch.is_empty() {
            return Ok(existing);
        }

        let id_s = id.to_string();
        let mut sql = String::from("UPDATE transactions SET ");
        let mut sets: Vec<&str> = Vec::new();
        let mut params_vec: Vec<&str> = Vec::new();
        for (column, value) in [
            ("name=?", &patch.name),
            ("description=?", &patch.description),
            ("category=?", &patch.category),
            ("amount=?", &patch.amount),
            ("date=?", &patch.date),
        ] {
            if let Some(v) = value {
                sets.push(column);
                params_vec.push(v.as_str());
            }
        }
        sql.push_str(&sets.join(", "));
        sql.push_str(" WHERE id=? AND owner_id=?");
        params_vec.push(&id_s);
        params_vec.push(owner);

        self.conn
            .execute(&sql, rusqlite::params_from_iter(params_vec.iter()))?;
        info!(owner, id, "updated transaction");
        self.notify_transactions(owner);
        self.transaction(owner, id)
    }

    fn delete_transaction(&mut self, owner: &str, id: i64) -> Result<(), StoreError> {
        let n = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND owner_id=?2",
            params![id, owner],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!(owner, id, "deleted transaction");
        self.notify_transactions(owner);
        Ok(())
    }

    fn upsert_budget(
        &mut self,
        owner: &str,
        category: &str,
        limit: Decimal,
    ) -> Result<Budget, StoreError> {
        let category = normalize_category(category);
        self.conn.execute(
            "INSERT INTO budgets(owner_id, category, limit_amount, created_at) VALUES (?1,?2,?3,?4)
             ON CONFLICT(owner_id, category) DO UPDATE SET limit_amount=excluded.limit_amount",
            params![owner, category, limit.to_string(), now_stamp()],
        )?;
        info!(owner, category = %category, limit = %limit, "saved budget");
        self.notify_budgets(owner);
        self.budgets(owner)?
            .into_iter()
            .find(|b| b.category == category)
            .ok_or_else(|| StoreError::Corrupt(format!("budget '{}' vanished after save", category)))
    }

    fn transactions(&self, owner: &str) -> Result<Vec<Transaction>, StoreError> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE owner_id=?1 ORDER BY date DESC, id DESC",
            TX_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![owner], raw_transaction)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(to_transaction(row?)?);
        }
        Ok(data)
    }

    fn budgets(&self, owner: &str) -> Result<Vec<Budget>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, category, limit_amount, created_at FROM budgets WHERE owner_id=?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![owner], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
            ))
        })?;
        let mut data = Vec::new();
        for row in rows {
            let (id, owner_id, category, limit_s, created_at) = row?;
            let limit = limit_s.parse::<Decimal>().map_err(|_| {
                StoreError::Corrupt(format!("invalid limit '{}' for budget {}", limit_s, id))
            })?;
            data.push(Budget {
                id,
                owner_id,
                category,
                limit,
                created_at,
            });
        }
        Ok(data)
    }
}
