// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use spendwise::commands::{doctor, theme, users};
use spendwise::db::{init_schema, open_or_init};
use spendwise::models::{NewTransaction, TxKind};
use spendwise::prefs::{Preferences, Theme};
use spendwise::session;
use spendwise::store::FinanceStore;
use spendwise::utils::set_setting;
use spendwise::cli;
use rusqlite::Connection;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[test]
fn theme_defaults_to_light_and_persists() {
    let conn = setup();
    let mut prefs = Preferences::load(&conn).unwrap();
    assert_eq!(prefs.theme, Theme::Light);

    let matches = cli::build_cli().get_matches_from(["spendwise", "theme", "toggle"]);
    if let Some(("theme", theme_m)) = matches.subcommand() {
        theme::handle(&conn, &mut prefs, theme_m).unwrap();
    } else {
        panic!("no theme subcommand");
    }
    assert_eq!(prefs.theme, Theme::Dark);
    assert_eq!(Preferences::load(&conn).unwrap().theme, Theme::Dark);
}

#[test]
fn unreadable_stored_theme_falls_back_to_default() {
    let conn = setup();
    set_setting(&conn, "theme", "sepia").unwrap();
    assert_eq!(Preferences::load(&conn).unwrap(), Preferences::default());
}

#[test]
fn login_logout_round() {
    let conn = setup();
    assert!(session::require(&conn, None).is_err());

    let matches = cli::build_cli().get_matches_from(["spendwise", "user", "login", "alice"]);
    if let Some(("user", user_m)) = matches.subcommand() {
        users::handle(&conn, user_m).unwrap();
    } else {
        panic!("no user subcommand");
    }
    assert_eq!(session::require(&conn, None).unwrap().owner_id, "alice");
    assert_eq!(session::require(&conn, Some("bob")).unwrap().owner_id, "bob");

    session::logout(&conn).unwrap();
    assert!(session::current(&conn).unwrap().is_none());
    assert!(session::login(&conn, "   ").is_err());
}

#[test]
fn database_file_keeps_data_between_opens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spendwise.sqlite");
    {
        let mut store = open_or_init(&path).unwrap();
        session::login(store.conn(), "alice").unwrap();
        store
            .create_transaction(
                "alice",
                &NewTransaction {
                    kind: TxKind::Expense,
                    name: "Rent".into(),
                    description: String::new(),
                    category: "Housing".into(),
                    amount: "800".into(),
                    date: "2024-05-01".into(),
                },
            )
            .unwrap();
    }
    let store = open_or_init(&path).unwrap();
    assert_eq!(session::current(store.conn()).unwrap().unwrap().owner_id, "alice");
    assert_eq!(store.transactions("alice").unwrap().len(), 1);
}

#[test]
fn doctor_lists_unreadable_fields() {
    let dir = tempdir().unwrap();
    let mut store = open_or_init(&dir.path().join("db.sqlite")).unwrap();
    for (amount, date) in [("10", "2024-01-01"), ("ten", "2024-01-02"), ("5", "soon")] {
        store
            .create_transaction(
                "alice",
                &NewTransaction {
                    kind: TxKind::Expense,
                    name: "x".into(),
                    description: String::new(),
                    category: "Misc".into(),
                    amount: amount.into(),
                    date: date.into(),
                },
            )
            .unwrap();
    }
    let issues = doctor::find_issues(&store.transactions("alice").unwrap());
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&"bad_amount"));
    assert!(kinds.contains(&"bad_date"));
}
