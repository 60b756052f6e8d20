// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived view state: everything the dashboard shows, computed from the
//! latest transaction and budget snapshots plus the table query.
//!
//! All functions here are pure. Amounts or dates that do not parse never
//! abort a computation: a bad amount counts as zero and a bad date keeps the
//! record out of date-keyed series. [`scan_anomalies`] reports how many
//! records were affected.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{category_key, Budget, Transaction, TxKind};
use crate::query::{Query, SortDirection, SortKey};

/// Utilisation, in percent, from which a budget counts as near its limit.
pub const NEAR_LIMIT_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const UNCATEGORIZED_KEY: &str = "uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetMetric {
    pub budget_id: i64,
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub is_over_budget: bool,
    pub is_near_limit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartAggregates {
    /// Expense totals per category, in first-seen order.
    pub category_totals: Vec<CategoryTotal>,
    /// Expense totals per day, oldest first.
    pub daily_totals: Vec<DailyTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ParseAnomalies {
    pub bad_amounts: usize,
    pub bad_dates: usize,
}

impl ParseAnomalies {
    pub fn is_empty(&self) -> bool {
        self.bad_amounts == 0 && self.bad_dates == 0
    }
}

/// Everything the presentation layer renders for one snapshot/query pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub totals: Totals,
    pub budgets: Vec<BudgetMetric>,
    pub table: Page<Transaction>,
    pub charts: ChartAggregates,
    pub anomalies: ParseAnomalies,
}

impl ViewModel {
    pub fn compute(transactions: &[Transaction], budgets: &[Budget], query: &Query) -> Self {
        let filtered = filter_and_sort(transactions, query);
        Self {
            totals: compute_totals(transactions),
            budgets: compute_budget_metrics(transactions, budgets),
            table: paginate(&filtered, query.page, query.page_size.get()),
            charts: chart_aggregates(transactions),
            anomalies: scan_anomalies(transactions),
        }
    }
}

fn amount_or_zero(t: &Transaction) -> Decimal {
    t.amount_value().unwrap_or_else(|| {
        debug!(id = t.id, amount = %t.amount, "amount does not parse, counted as zero");
        Decimal::ZERO
    })
}

pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for t in transactions {
        let amount = amount_or_zero(t);
        match t.kind {
            TxKind::Income => totals.income = totals.income.saturating_add(amount),
            TxKind::Expense => totals.expense = totals.expense.saturating_add(amount),
        }
    }
    totals.balance = totals.income.saturating_sub(totals.expense);
    totals
}

/// Budget progress in budget order, one metric per budget.
pub fn compute_budget_metrics(transactions: &[Transaction], budgets: &[Budget]) -> Vec<BudgetMetric> {
    let mut spending: HashMap<String, Decimal> = HashMap::new();
    for t in transactions.iter().filter(|t| t.kind == TxKind::Expense) {
        let mut key = category_key(&t.category);
        if key.is_empty() {
            key = UNCATEGORIZED_KEY.to_string();
        }
        let slot = spending.entry(key).or_insert(Decimal::ZERO);
        *slot = slot.saturating_add(amount_or_zero(t));
    }

    budgets
        .iter()
        .map(|b| {
            let spent = spending
                .get(&category_key(&b.category))
                .copied()
                .unwrap_or(Decimal::ZERO);
            budget_metric(b, spent)
        })
        .collect()
}

fn budget_metric(budget: &Budget, spent: Decimal) -> BudgetMetric {
    let limit = budget.limit;
    let (percentage, is_over_budget) = if limit <= Decimal::ZERO {
        (Decimal::ZERO, spent > Decimal::ZERO)
    } else {
        let pct = spent
            .checked_mul(HUNDRED)
            .and_then(|v| v.checked_div(limit))
            .unwrap_or(Decimal::MAX);
        (pct, spent > limit)
    };
    BudgetMetric {
        budget_id: budget.id,
        category: budget.category.clone(),
        limit,
        spent,
        remaining: limit.saturating_sub(spent),
        percentage,
        is_over_budget,
        is_near_limit: percentage >= NEAR_LIMIT_PERCENT && spent <= limit,
    }
}

fn matches_search(t: &Transaction, needle: &str) -> bool {
    needle.is_empty()
        || t.name.to_lowercase().contains(needle)
        || t.description.to_lowercase().contains(needle)
}

fn compare(a: &Transaction, b: &Transaction, key: SortKey) -> Ordering {
    match key {
        SortKey::Category => a.category.cmp(&b.category),
        SortKey::Amount => amount_or_zero(a).cmp(&amount_or_zero(b)),
        // Unparsable dates sort before every real date.
        SortKey::Date => a.occurred_on().cmp(&b.occurred_on()),
    }
}

/// Applies the query's search, type filter and sort.
///
/// The sort is stable; descending order reverses the comparison, so records
/// with equal keys keep their snapshot order in both directions.
pub fn filter_and_sort(transactions: &[Transaction], query: &Query) -> Vec<Transaction> {
    let needle = query.search.to_lowercase();
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| matches_search(t, &needle) && query.type_filter.matches(t.kind))
        .cloned()
        .collect();

    let sort = query.sort;
    out.sort_by(|a, b| {
        let ord = compare(a, b, sort.key);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    out
}

/// Slices out one page. `total_pages` is at least 1 so an empty result reads
/// as "no results" rather than "page 1 of 0". A page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size);
    let slice = if start >= items.len() {
        &[][..]
    } else {
        let end = start.saturating_add(page_size).min(items.len());
        &items[start..end]
    };
    Page {
        items: slice.to_vec(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

pub fn chart_aggregates(transactions: &[Transaction]) -> ChartAggregates {
    let mut category_totals: Vec<CategoryTotal> = Vec::new();
    let mut category_index: HashMap<&str, usize> = HashMap::new();
    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for t in transactions.iter().filter(|t| t.kind == TxKind::Expense) {
        let amount = t.amount_value();
        let value = amount.unwrap_or(Decimal::ZERO);

        let idx = *category_index.entry(t.category.as_str()).or_insert_with(|| {
            category_totals.push(CategoryTotal {
                category: t.category.clone(),
                amount: Decimal::ZERO,
            });
            category_totals.len() - 1
        });
        category_totals[idx].amount = category_totals[idx].amount.saturating_add(value);

        if amount.is_none() {
            continue;
        }
        if let Some(day) = t.occurred_on() {
            let slot = daily.entry(day).or_insert(Decimal::ZERO);
            *slot = slot.saturating_add(value);
        }
    }

    ChartAggregates {
        category_totals,
        daily_totals: daily
            .into_iter()
            .map(|(date, amount)| DailyTotal { date, amount })
            .collect(),
    }
}

/// Counts records whose amount or date cannot be used by the aggregations.
pub fn scan_anomalies(transactions: &[Transaction]) -> ParseAnomalies {
    let mut anomalies = ParseAnomalies::default();
    for t in transactions {
        if t.amount_value().is_none() {
            anomalies.bad_amounts += 1;
        }
        if t.occurred_on().is_none() {
            anomalies.bad_dates += 1;
        }
    }
    if !anomalies.is_empty() {
        warn!(
            bad_amounts = anomalies.bad_amounts,
            bad_dates = anomalies.bad_dates,
            "snapshot contains records that do not parse"
        );
    }
    anomalies
}
