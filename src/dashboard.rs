// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing::warn;

use crate::db::SqliteStore;
use crate::engine::ViewModel;
use crate::error::{StoreError, SubscriptionError};
use crate::models::{Budget, Transaction};
use crate::query::Query;
use crate::subscription::{SnapshotEvent, Subscription};

/// Holds the latest snapshots for one user and recomputes the view on demand.
///
/// Each snapshot replaces the previous one wholesale; nothing is merged.
pub struct Dashboard {
    subscription: Option<Subscription>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    query: Query,
}

impl Dashboard {
    pub fn attach(store: &SqliteStore, owner: &str) -> Result<Self, StoreError> {
        Ok(Self {
            subscription: Some(store.subscribe(owner)?),
            transactions: Vec::new(),
            budgets: Vec::new(),
            query: Query::default(),
        })
    }

    pub fn owner(&self) -> Option<&str> {
        self.subscription.as_ref().map(|s| s.owner())
    }

    /// Applies every queued snapshot. Returns how many were applied.
    ///
    /// A closed channel detaches the dashboard; the last snapshots stay
    /// visible and the error is handed back for the caller to report.
    pub fn pump(&mut self) -> Result<usize, SubscriptionError> {
        let Some(sub) = &self.subscription else {
            return Ok(0);
        };
        match sub.drain() {
            Ok(events) => {
                let n = events.len();
                for ev in events {
                    self.apply(ev);
                }
                Ok(n)
            }
            Err(e) => {
                warn!("snapshot subscription ended: {e}");
                self.subscription = None;
                Err(e)
            }
        }
    }

    pub fn apply(&mut self, event: SnapshotEvent) {
        match event {
            SnapshotEvent::Transactions(t) => self.transactions = t,
            SnapshotEvent::Budgets(b) => self.budgets = b,
        }
    }

    /// Releases the current subscription before acquiring one for `owner`,
    /// and forgets the previous user's data.
    pub fn switch_user(&mut self, store: &SqliteStore, owner: &str) -> Result<(), StoreError> {
        self.detach();
        self.query = Query::default();
        self.subscription = Some(store.subscribe(owner)?);
        Ok(())
    }

    pub fn detach(&mut self) {
        self.subscription = None;
        self.transactions.clear();
        self.budgets.clear();
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn set_query(&mut self, query: Query) {
        self.query = query;
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::compute(&self.transactions, &self.budgets, &self.query)
    }
}
