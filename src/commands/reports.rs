// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::budgets::print_metrics;
use super::query_from_args;
use super::transactions::print_page;
use crate::dashboard::Dashboard;
use crate::db::SqliteStore;
use crate::engine::{ChartAggregates, Totals, ViewModel};
use crate::prefs::Preferences;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(
    store: &SqliteStore,
    session: &Session,
    prefs: &Preferences,
    m: &clap::ArgMatches,
) -> Result<()> {
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut dash = Dashboard::attach(store, &session.owner_id)?;
    dash.pump()?;
    if name == "dashboard" {
        dash.set_query(query_from_args(sub)?);
    }
    let view = dash.view();

    match name {
        "summary" => {
            if !maybe_print_json(json_flag, jsonl_flag, &view.totals)? {
                print_totals(prefs, &view.totals);
            }
        }
        "categories" => {
            if !maybe_print_json(json_flag, jsonl_flag, &view.charts.category_totals)? {
                print_categories(prefs, &view.charts);
            }
        }
        "daily" => {
            if !maybe_print_json(json_flag, jsonl_flag, &view.charts.daily_totals)? {
                print_daily(prefs, &view.charts);
            }
        }
        "dashboard" => {
            if !maybe_print_json(json_flag, jsonl_flag, &view)? {
                print_dashboard(prefs, &view);
            }
        }
        _ => {}
    }
    Ok(())
}

fn print_totals(prefs: &Preferences, totals: &Totals) {
    let data = vec![
        vec!["Current balance".to_string(), fmt_money(&totals.balance)],
        vec!["Total income".to_string(), fmt_money(&totals.income)],
        vec!["Total expenses".to_string(), fmt_money(&totals.expense)],
    ];
    println!("{}", pretty_table(prefs.theme, &["", "Amount"], data));
}

fn print_categories(prefs: &Preferences, charts: &ChartAggregates) {
    let data = charts
        .category_totals
        .iter()
        .map(|c| vec![c.category.clone(), fmt_money(&c.amount)])
        .collect();
    println!("{}", pretty_table(prefs.theme, &["Category", "Spent"], data));
}

fn print_daily(prefs: &Preferences, charts: &ChartAggregates) {
    let data = charts
        .daily_totals
        .iter()
        .map(|d| vec![d.date.to_string(), fmt_money(&d.amount)])
        .collect();
    println!("{}", pretty_table(prefs.theme, &["Date", "Spent"], data));
}

fn print_dashboard(prefs: &Preferences, view: &ViewModel) {
    print_totals(prefs, &view.totals);
    if !view.budgets.is_empty() {
        println!("Budget progress");
        print_metrics(prefs, &view.budgets);
    }
    if !view.charts.category_totals.is_empty() {
        println!("Spending by category");
        print_categories(prefs, &view.charts);
    }
    println!("Transactions");
    print_page(prefs, &view.table);
    if !view.anomalies.is_empty() {
        eprintln!(
            "warning: {} amount(s) and {} date(s) could not be read; run `spendwise doctor`",
            view.anomalies.bad_amounts, view.anomalies.bad_dates
        );
    }
}
