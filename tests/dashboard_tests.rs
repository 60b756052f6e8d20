// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use spendwise::dashboard::Dashboard;
use spendwise::db::SqliteStore;
use spendwise::error::SubscriptionError;
use spendwise::models::{NewTransaction, TxKind};
use spendwise::query::Query;
use spendwise::store::FinanceStore;

fn new_tx(kind: TxKind, name: &str, category: &str, amount: &str, date: &str) -> NewTransaction {
    NewTransaction {
        kind,
        name: name.into(),
        description: String::new(),
        category: category.into(),
        amount: amount.into(),
        date: date.into(),
    }
}

fn seeded() -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .create_transaction("alice", &new_tx(TxKind::Income, "Salary", "Income", "1000", "2024-01-05"))
        .unwrap();
    store
        .create_transaction("alice", &new_tx(TxKind::Expense, "Food", "Food", "200", "2024-01-10"))
        .unwrap();
    store
        .create_transaction("bob", &new_tx(TxKind::Expense, "Rent", "Housing", "700", "2024-01-01"))
        .unwrap();
    store
        .upsert_budget("alice", "Food", Decimal::new(300, 0))
        .unwrap();
    store
}

#[test]
fn view_follows_store_mutations() {
    let mut store = seeded();
    let mut dash = Dashboard::attach(&store, "alice").unwrap();
    assert_eq!(dash.pump().unwrap(), 2);
    let view = dash.view();
    assert_eq!(view.totals.balance, Decimal::new(800, 0));
    assert_eq!(view.budgets[0].spent, Decimal::new(200, 0));

    store
        .create_transaction("alice", &new_tx(TxKind::Expense, "Food", "Food", "50", "2024-01-12"))
        .unwrap();
    assert_eq!(dash.pump().unwrap(), 1);
    let view = dash.view();
    assert_eq!(view.totals.expense, Decimal::new(250, 0));
    assert_eq!(view.budgets[0].percentage.round_dp(2), Decimal::new(8333, 2));
    assert_eq!(view.table.items[0].amount, "50");

    assert_eq!(dash.pump().unwrap(), 0);
}

#[test]
fn switching_user_releases_old_subscription() {
    let store = seeded();
    let mut dash = Dashboard::attach(&store, "alice").unwrap();
    dash.pump().unwrap();
    dash.set_query(Query::default().with_search("food"));

    dash.switch_user(&store, "bob").unwrap();
    assert_eq!(store.hub().subscriber_count("alice"), 0);
    assert_eq!(store.hub().subscriber_count("bob"), 1);
    assert_eq!(dash.owner(), Some("bob"));
    assert_eq!(dash.query(), &Query::default());
    assert!(dash.transactions().is_empty());

    dash.pump().unwrap();
    let names: Vec<&str> = dash.transactions().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Rent"]);
    assert!(dash.budgets().is_empty());
}

#[test]
fn dropping_dashboard_releases_subscription() {
    let store = seeded();
    let dash = Dashboard::attach(&store, "alice").unwrap();
    assert_eq!(store.hub().subscriber_count("alice"), 1);
    drop(dash);
    assert_eq!(store.hub().subscriber_count("alice"), 0);
}

#[test]
fn closed_channel_keeps_last_snapshot() {
    let store = seeded();
    let mut dash = Dashboard::attach(&store, "alice").unwrap();
    drop(store);

    // Snapshots queued before the close are still applied.
    assert_eq!(dash.pump().unwrap(), 2);
    assert_eq!(dash.pump(), Err(SubscriptionError::Closed));
    assert_eq!(dash.owner(), None);
    assert_eq!(dash.transactions().len(), 2);
    assert_eq!(dash.pump(), Ok(0));
}
