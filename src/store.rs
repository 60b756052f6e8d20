// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The mutation and snapshot boundary to wherever records are kept.

use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::{Budget, NewTransaction, Transaction, TransactionPatch};

/// Creates, updates and deletes one user's transactions and budgets.
pub trait FinanceStore {
    /// Insert a new transaction; the store assigns `id` and `created_at`.
    fn create_transaction(&mut self, owner: &str, new: &NewTransaction)
    -> Result<Transaction, StoreError>;

    /// Apply the non-empty fields of `patch` to an existing transaction.
    fn update_transaction(
        &mut self,
        owner: &str,
        id: i64,
        patch: &TransactionPatch,
    ) -> Result<Transaction, StoreError>;

    fn delete_transaction(&mut self, owner: &str, id: i64) -> Result<(), StoreError>;

    /// Set the limit for `category`, updating the owner's existing budget for
    /// that category if there is one.
    fn upsert_budget(
        &mut self,
        owner: &str,
        category: &str,
        limit: Decimal,
    ) -> Result<Budget, StoreError>;

    /// Full transaction snapshot, most recent date first.
    fn transactions(&self, owner: &str) -> Result<Vec<Transaction>, StoreError>;

    /// Full budget snapshot, in no particular order.
    fn budgets(&self, owner: &str) -> Result<Vec<Budget>, StoreError>;
}
