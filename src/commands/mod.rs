// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod users;
pub mod transactions;
pub mod budgets;
pub mod reports;
pub mod importer;
pub mod exporter;
pub mod theme;
pub mod doctor;

use anyhow::{anyhow, Context, Result};

use crate::db::SqliteStore;
use crate::models::Transaction;
use crate::query::{Query, SortDirection, SortKey, SortSpec, TypeFilter};
use crate::store::FinanceStore;

/// Builds the table query from `--search/--type/--sort/--dir/--page`.
pub fn query_from_args(sub: &clap::ArgMatches) -> Result<Query> {
    let type_filter: TypeFilter = sub
        .get_one::<String>("type")
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| anyhow!(e))?
        .unwrap_or_default();
    let key: SortKey = sub
        .get_one::<String>("sort")
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| anyhow!(e))?
        .unwrap_or(SortKey::Date);
    let direction: SortDirection = sub
        .get_one::<String>("dir")
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| anyhow!(e))?
        .unwrap_or(SortDirection::Desc);
    let search = sub.get_one::<String>("search").cloned().unwrap_or_default();
    let page = sub.get_one::<usize>("page").copied().unwrap_or(1);

    Ok(Query::default()
        .with_search(search)
        .with_type_filter(type_filter)
        .with_sort(SortSpec { key, direction })
        .with_page(page))
}

pub(crate) fn find_transaction(store: &SqliteStore, owner: &str, id: i64) -> Result<Transaction> {
    store
        .transactions(owner)
        .context("Could not load transactions")?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow!("Transaction {} not found", id))
}
