// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use spendwise::commands::{query_from_args, transactions};
use spendwise::db::SqliteStore;
use spendwise::models::TxKind;
use spendwise::prefs::Preferences;
use spendwise::query::{SortDirection, SortKey, TypeFilter, PAGE_SIZE};
use spendwise::session::Session;
use spendwise::store::FinanceStore;
use spendwise::{cli, dashboard::Dashboard};

fn session() -> Session {
    Session {
        owner_id: "alice".into(),
    }
}

fn run_tx(store: &mut SqliteStore, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["spendwise", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(store, &session(), &Preferences::default(), tx_m)
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_records_expense_and_income() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    run_tx(
        &mut store,
        &["add", "--amount", "12.50", "--category", "Food", "--date", "2024-01-10"],
    )
    .unwrap();
    run_tx(
        &mut store,
        &[
            "add", "--type", "income", "--name", "Salary", "--amount", "1000", "--date",
            "2024-01-05",
        ],
    )
    .unwrap();

    let all = store.transactions("alice").unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].kind, TxKind::Expense);
    assert_eq!(all[0].name, "Food");
    assert_eq!(all[0].amount, "12.50");
    assert_eq!(all[1].kind, TxKind::Income);
    assert_eq!(all[1].category, "Income");
    assert!(store.transactions("bob").unwrap().is_empty());
}

#[test]
fn add_rejects_invalid_input_without_writing() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert!(run_tx(&mut store, &["add", "--amount", "5"]).is_err());
    assert!(run_tx(&mut store, &["add", "--amount", "0", "--category", "Food"]).is_err());
    assert!(run_tx(
        &mut store,
        &["add", "--amount", "5", "--category", "Food", "--date", "2999-01-01"]
    )
    .is_err());
    assert!(run_tx(&mut store, &["add", "--type", "income", "--amount", "5"]).is_err());
    assert!(store.transactions("alice").unwrap().is_empty());
}

#[test]
fn edit_changes_only_given_fields() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    run_tx(
        &mut store,
        &[
            "add", "--amount", "20", "--category", "Food", "--description", "lunch", "--date",
            "2024-01-10",
        ],
    )
    .unwrap();
    let id = store.transactions("alice").unwrap()[0].id.to_string();

    run_tx(&mut store, &["edit", &id, "--amount", "25.5"]).unwrap();
    let t = &store.transactions("alice").unwrap()[0];
    assert_eq!(t.amount, "25.5");
    assert_eq!(t.description, "lunch");
    assert_eq!(t.date, "2024-01-10");

    assert!(run_tx(&mut store, &["edit", &id, "--amount=-1"]).is_err());
    assert!(run_tx(&mut store, &["edit", "999", "--amount", "1"]).is_err());
    assert_eq!(store.transactions("alice").unwrap()[0].amount, "25.5");
}

#[test]
fn rm_then_undo_restores_record() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    run_tx(
        &mut store,
        &["add", "--amount", "9.99", "--category", "Music", "--date", "2024-03-01"],
    )
    .unwrap();
    let original = store.transactions("alice").unwrap().remove(0);

    run_tx(&mut store, &["rm", &original.id.to_string()]).unwrap();
    assert!(store.transactions("alice").unwrap().is_empty());
    assert!(store.load_pending_undo("alice").unwrap().is_some());

    run_tx(&mut store, &["undo"]).unwrap();
    let restored = store.transactions("alice").unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].name, original.name);
    assert_eq!(restored[0].amount, original.amount);
    assert_ne!(restored[0].id, original.id);
    assert!(store.load_pending_undo("alice").unwrap().is_none());

    // Nothing left to undo.
    run_tx(&mut store, &["undo"]).unwrap();
    assert_eq!(store.transactions("alice").unwrap().len(), 1);
}

#[test]
fn list_args_build_query() {
    let matches = cli::build_cli().get_matches_from([
        "spendwise", "tx", "list", "-s", "Coffee", "--type", "expense", "--sort", "amount",
        "--dir", "asc", "--page", "3",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let q = query_from_args(list_m).unwrap();
    assert_eq!(q.search, "Coffee");
    assert_eq!(q.type_filter, TypeFilter::Expense);
    assert_eq!(q.sort.key, SortKey::Amount);
    assert_eq!(q.sort.direction, SortDirection::Asc);
    assert_eq!(q.page, 3);
    assert_eq!(q.page_size, PAGE_SIZE);
}

#[test]
fn list_pages_ten_at_a_time() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    for day in 1..=12 {
        let date = format!("2024-01-{:02}", day);
        run_tx(
            &mut store,
            &["add", "--amount", "1", "--category", "Misc", "--date", &date],
        )
        .unwrap();
    }
    run_tx(&mut store, &["list", "--page", "2"]).unwrap();

    let mut dash = Dashboard::attach(&store, "alice").unwrap();
    dash.pump().unwrap();
    let first = dash.view().table;
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items[0].date, "2024-01-12");

    dash.set_query(dash.query().clone().with_page(2));
    let second = dash.view().table;
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[1].date, "2024-01-01");
}
