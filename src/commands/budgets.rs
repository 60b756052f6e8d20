// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::Dashboard;
use crate::db::SqliteStore;
use crate::engine::BudgetMetric;
use crate::error::ValidationError;
use crate::models::normalize_category;
use crate::prefs::Preferences;
use crate::session::Session;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rust_decimal::Decimal;

pub fn handle(
    store: &mut SqliteStore,
    session: &Session,
    prefs: &Preferences,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, session, sub)?,
        Some(("list", sub)) => list(store, session, prefs, sub)?,
        _ => {}
    }
    Ok(())
}

/// Validated `(display category, limit)` for a budget form.
pub fn parse_budget_input(category: &str, limit: &str) -> Result<(String, Decimal), ValidationError> {
    let category = normalize_category(category);
    if category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    let limit = limit
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|d| *d > Decimal::ZERO)
        .ok_or_else(|| ValidationError::InvalidLimit(limit.trim().to_string()))?;
    Ok((category, limit))
}

fn set(store: &mut SqliteStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").context("category missing")?;
    let limit = sub.get_one::<String>("limit").context("limit missing")?;
    let (category, limit) = parse_budget_input(cat, limit)?;
    let budget = store
        .upsert_budget(&session.owner_id, &category, limit)
        .context("Failed to save budget")?;
    println!("Budget for {} set to {}", budget.category, fmt_money(&budget.limit));
    Ok(())
}

fn status(m: &BudgetMetric) -> &'static str {
    if m.is_over_budget {
        "OVER"
    } else if m.is_near_limit {
        "near limit"
    } else {
        "ok"
    }
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
    let metrics = dash.view().budgets;

    if !maybe_print_json(json_flag, jsonl_flag, &metrics)? {
        print_metrics(prefs, &metrics);
    }
    Ok(())
}

pub(crate) fn print_metrics(prefs: &Preferences, metrics: &[BudgetMetric]) {
    let rows: Vec<Vec<String>> = metrics
        .iter()
        .map(|m| {
            vec![
                m.category.clone(),
                fmt_money(&m.limit),
                fmt_money(&m.spent),
                fmt_money(&m.remaining),
                format!("{:.1}%", m.percentage.round_dp(1)),
                status(m).to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            prefs.theme,
            &["Category", "Limit", "Spent", "Remaining", "Used", "Status"],
            rows,
        )
    );
}
