// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, Utc};

use super::{find_transaction, query_from_args};
use crate::dashboard::Dashboard;
use crate::db::SqliteStore;
use crate::engine::Page;
use crate::models::{Transaction, TransactionDraft, TransactionPatch, TxKind};
use crate::prefs::Preferences;
use crate::session::Session;
use crate::store::FinanceStore;
use crate::undo::{UndoBuffer, UndoOutcome, UNDO_WINDOW_SECS};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(
    store: &mut SqliteStore,
    session: &Session,
    prefs: &Preferences,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, session, sub)?,
        Some(("edit", sub)) => edit(store, session, sub)?,
        Some(("list", sub)) => list(store, session, prefs, sub)?,
        Some(("rm", sub)) => remove(store, session, sub)?,
        Some(("undo", _)) => undo(store, session)?,
        _ => {}
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn add(store: &mut SqliteStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxKind>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or(TxKind::Expense);

    let field = |name: &str| sub.get_one::<String>(name).cloned().unwrap_or_default();
    let draft = TransactionDraft {
        kind,
        name: field("name"),
        description: field("description"),
        category: field("category"),
        amount: field("amount"),
        date: sub
            .get_one::<String>("date")
            .cloned()
            .unwrap_or_else(|| today().to_string()),
    };
    let new = draft.validate(today())?;
    let tx = store
        .create_transaction(&session.owner_id, &new)
        .context("Failed to save transaction")?;
    println!(
        "Recorded {} '{}' {} on {} (id {})",
        tx.kind, tx.name, tx.amount, tx.date, tx.id
    );
    Ok(())
}

fn edit(store: &mut SqliteStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id missing")?;
    let existing = find_transaction(store, &session.owner_id, id)?;

    let mut draft = existing.to_draft();
    if let Some(v) = sub.get_one::<String>("name") {
        draft.name = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("description") {
        draft.description = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("category") {
        draft.category = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("amount") {
        draft.amount = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("date") {
        draft.date = v.clone();
    }

    let updated = draft.validate(today())?;
    let patch = TransactionPatch::between(&existing, &updated);
    if patch.is_empty() {
        println!("Nothing to change for transaction {}", id);
        return Ok(());
    }
    let tx = store
        .update_transaction(&session.owner_id, id, &patch)
        .context("Failed to update transaction")?;
    println!("Updated transaction {} ('{}')", tx.id, tx.name);
    Ok(())
}

fn list(
    store: &SqliteStore,
    session: &Session,
    prefs: &Preferences,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut dash = Dashboard::attach(store, &session.owner_id)?;
    dash.pump()?;
    dash.set_query(query_from_args(sub)?);
    let page = dash.view().table;

    if !maybe_print_json(json_flag, jsonl_flag, &page)? {
        print_page(prefs, &page);
    }
    Ok(())
}

pub(crate) fn print_page(prefs: &Preferences, page: &Page<Transaction>) {
    if page.total_items == 0 {
        println!("No results");
        return;
    }
    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.clone(),
                t.name.clone(),
                t.category.clone(),
                t.kind.to_string(),
                t.amount.clone(),
                t.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            prefs.theme,
            &["ID", "Date", "Name", "Category", "Type", "Amount", "Description"],
            rows,
        )
    );
    println!(
        "Page {} of {} ({} results)",
        page.page, page.total_pages, page.total_items
    );
}

fn remove(store: &mut SqliteStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let owner = session.owner_id.as_str();
    let id = *sub.get_one::<i64>("id").context("id missing")?;
    let now = Utc::now();
    let record = find_transaction(store, owner, id)?;

    let mut buffer = UndoBuffer::resume(store.load_pending_undo(owner)?);
    buffer.expire(now);
    buffer
        .delete(store, owner, &record, now)
        .with_context(|| format!("Could not delete transaction {}", id))?;
    store.save_pending_undo(owner, buffer.pending())?;
    println!(
        "Deleted '{}'. Run `spendwise tx undo` within {}s to restore it.",
        record.name, UNDO_WINDOW_SECS
    );
    Ok(())
}

fn undo(store: &mut SqliteStore, session: &Session) -> Result<()> {
    let owner = session.owner_id.as_str();
    let mut buffer = UndoBuffer::resume(store.load_pending_undo(owner)?);
    let outcome = buffer.undo(store, owner, Utc::now());
    store.save_pending_undo(owner, buffer.pending())?;
    match outcome.context("Could not restore transaction")? {
        UndoOutcome::Restored(t) => println!("Restored '{}' as transaction {}", t.name, t.id),
        UndoOutcome::Expired => println!("The undo window has closed"),
        UndoOutcome::NothingPending => println!("Nothing to undo"),
    }
    Ok(())
}
