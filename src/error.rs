// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

/// Local input problems. The mutation that would have used the input is never issued.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,

    #[error("category is required for expenses")]
    MissingCategory,

    #[error("amount is required")]
    MissingAmount,

    #[error("invalid amount '{0}', expected a positive number")]
    InvalidAmount(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Transactions record money that has already moved.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(NaiveDate),

    #[error("invalid budget limit '{0}', expected a positive number")]
    InvalidLimit(String),
}

/// Failures reported by a [`crate::store::FinanceStore`] mutation or read.
///
/// These are never retried automatically; callers revert any optimistic
/// change and surface the message.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("transaction {0} not found")]
    NotFound(i64),

    #[error("stored record is malformed: {0}")]
    Corrupt(String),

    #[error("store rejected the mutation: {0}")]
    Rejected(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Channel-level failure of a snapshot subscription.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("snapshot channel closed")]
    Closed,
}
