// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Category given to income entries when none is supplied.
pub const INCOME_CATEGORY: &str = "Income";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// A recorded money movement, exactly as the store delivered it.
///
/// `amount` and `date` stay textual: snapshots may carry values that do not
/// parse, and aggregation has to degrade gracefully instead of rejecting the
/// whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner_id: String,
    pub kind: TxKind,
    pub name: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub date: String, // YYYY-MM-DD, sometimes a full ISO timestamp
    pub created_at: String,
}

impl Transaction {
    /// The amount as a non-negative decimal, or `None` when it cannot be used.
    pub fn amount_value(&self) -> Option<Decimal> {
        parse_amount(&self.amount)
    }

    /// The calendar day of the transaction, ignoring any time component.
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }

    /// Raw editable fields of this record, for building an edit form.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            amount: self.amount.clone(),
            date: self.date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub owner_id: String,
    pub category: String,
    pub limit: Decimal,
    pub created_at: String,
}

/// Unvalidated user input for a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TxKind,
    pub name: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub date: String,
}

impl TransactionDraft {
    pub fn new(kind: TxKind) -> Self {
        Self {
            kind,
            name: String::new(),
            description: String::new(),
            category: String::new(),
            amount: String::new(),
            date: String::new(),
        }
    }

    pub fn validate(self, today: NaiveDate) -> Result<NewTransaction, ValidationError> {
        let name = self.name.trim().to_string();
        let category = self.category.trim().to_string();
        let (name, category) = match self.kind {
            TxKind::Expense => {
                if category.is_empty() {
                    return Err(ValidationError::MissingCategory);
                }
                // Expenses are labelled by their category.
                (category.clone(), category)
            }
            TxKind::Income => {
                if name.is_empty() {
                    return Err(ValidationError::MissingName);
                }
                let category = if category.is_empty() {
                    INCOME_CATEGORY.to_string()
                } else {
                    category
                };
                (name, category)
            }
        };

        let amount_raw = self.amount.trim();
        if amount_raw.is_empty() {
            return Err(ValidationError::MissingAmount);
        }
        let amount = amount_raw
            .parse::<Decimal>()
            .ok()
            .filter(|d| *d > Decimal::ZERO)
            .ok_or_else(|| ValidationError::InvalidAmount(amount_raw.to_string()))?;

        let date_raw = self.date.trim();
        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date_raw.to_string()))?;
        if date > today {
            return Err(ValidationError::FutureDate(date));
        }

        Ok(NewTransaction {
            kind: self.kind,
            name,
            description: self.description.trim().to_string(),
            category,
            amount: amount.to_string(),
            date: date.to_string(),
        })
    }
}

/// A transaction record minus the fields the store assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub name: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub date: String,
}

impl From<&Transaction> for NewTransaction {
    fn from(t: &Transaction) -> Self {
        Self {
            kind: t.kind,
            name: t.name.clone(),
            description: t.description.clone(),
            category: t.category.clone(),
            amount: t.amount.clone(),
            date: t.date.clone(),
        }
    }
}

/// Partial update of a transaction; `None` leaves the field unchanged.
///
/// The kind of a transaction is fixed at creation and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
}

impl TransactionPatch {
    /// Fields of `updated` that differ from `existing`.
    pub fn between(existing: &Transaction, updated: &NewTransaction) -> Self {
        fn changed(old: &str, new: &str) -> Option<String> {
            (old != new).then(|| new.to_string())
        }
        Self {
            name: changed(&existing.name, &updated.name),
            description: changed(&existing.description, &updated.description),
            category: changed(&existing.category, &updated.category),
            amount: changed(&existing.amount, &updated.amount),
            date: changed(&existing.date, &updated.date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.date.is_none()
    }
}

pub(crate) fn parse_amount(raw: &str) -> Option<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|d| !d.is_sign_negative())
}

pub(crate) fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Display form of a budget category: first letter upper-case, the rest lower.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Key used to match budget categories against transaction categories.
pub fn category_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}
