// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use spendwise::{cli, commands, db, logging, prefs::Preferences, session};

fn main() -> Result<()> {
    logging::init();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = db::resolve_db_path(matches.get_one::<String>("db").map(String::as_str))?;
    let mut store = db::open_or_init(&path)?;
    let mut prefs = Preferences::load(store.conn())?;
    let user = matches.get_one::<String>("user").map(String::as_str);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
        }
        Some(("user", sub)) => commands::users::handle(store.conn(), sub)?,
        Some(("theme", sub)) => commands::theme::handle(store.conn(), &mut prefs, sub)?,
        Some(("tx", sub)) => {
            let s = session::require(store.conn(), user)?;
            commands::transactions::handle(&mut store, &s, &prefs, sub)?
        }
        Some(("budget", sub)) => {
            let s = session::require(store.conn(), user)?;
            commands::budgets::handle(&mut store, &s, &prefs, sub)?
        }
        Some(("report", sub)) => {
            let s = session::require(store.conn(), user)?;
            commands::reports::handle(&store, &s, &prefs, sub)?
        }
        Some(("import", sub)) => {
            let s = session::require(store.conn(), user)?;
            commands::importer::handle(&mut store, &s, sub)?
        }
        Some(("export", sub)) => {
            let s = session::require(store.conn(), user)?;
            commands::exporter::handle(&store, &s, sub)?
        }
        Some(("doctor", _)) => {
            let s = session::require(store.conn(), user)?;
            commands::doctor::handle(&store, &s, &prefs)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
