// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Optimistic delete with a timed undo window.
//!
//! A deleted record moves from present to pending-undo and then either gets
//! restored (re-created under a new id) or purged once its timer runs out.
//! Only one record is held at a time; a newer delete replaces it. Time is
//! passed in by the caller, so the window can be checked without a running
//! event loop and survives a restart of the process.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{NewTransaction, Transaction};
use crate::store::FinanceStore;

pub const UNDO_WINDOW_SECS: i64 = 10;

/// Deadline for one pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoTimer {
    pub armed_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

impl UndoTimer {
    pub fn arm(now: DateTime<Utc>, window: TimeDelta) -> Self {
        Self {
            armed_at: now,
            deadline: now + window,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.deadline - now).max(TimeDelta::zero())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingUndo {
    pub record: Transaction,
    pub timer: UndoTimer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// The record was re-created; this is the new copy.
    Restored(Transaction),
    /// The window had closed; the captured copy is gone.
    Expired,
    NothingPending,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UndoPhase {
    Idle,
    Pending { id: i64, remaining: TimeDelta },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoBuffer {
    window: TimeDelta,
    pending: Option<PendingUndo>,
}

impl Default for UndoBuffer {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(UNDO_WINDOW_SECS))
    }
}

impl UndoBuffer {
    pub fn new(window: TimeDelta) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// A buffer resuming a pending record persisted by an earlier run.
    pub fn resume(pending: Option<PendingUndo>) -> Self {
        Self {
            pending,
            ..Self::default()
        }
    }

    pub fn pending(&self) -> Option<&PendingUndo> {
        self.pending.as_ref()
    }

    pub fn phase(&self, now: DateTime<Utc>) -> UndoPhase {
        match &self.pending {
            Some(p) if !p.timer.is_expired(now) => UndoPhase::Pending {
                id: p.record.id,
                remaining: p.timer.remaining(now),
            },
            _ => UndoPhase::Idle,
        }
    }

    /// Deletes `record` and holds a copy for undo.
    ///
    /// If the store refuses the delete nothing changes: the record is still
    /// present and any earlier pending record stays restorable.
    pub fn delete<S: FinanceStore + ?Sized>(
        &mut self,
        store: &mut S,
        owner: &str,
        record: &Transaction,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        store.delete_transaction(owner, record.id)?;
        if let Some(prev) = self.pending.take() {
            debug!(id = prev.record.id, "discarding superseded undo record");
        }
        self.pending = Some(PendingUndo {
            record: record.clone(),
            timer: UndoTimer::arm(now, self.window),
        });
        info!(owner, id = record.id, "transaction deleted, undo available");
        Ok(())
    }

    /// Restores the pending record if its window is still open.
    ///
    /// A failed re-create keeps the record pending so it can be retried
    /// before the deadline.
    pub fn undo<S: FinanceStore + ?Sized>(
        &mut self,
        store: &mut S,
        owner: &str,
        now: DateTime<Utc>,
    ) -> Result<UndoOutcome, StoreError> {
        let Some(pending) = self.pending.take() else {
            return Ok(UndoOutcome::NothingPending);
        };
        if pending.timer.is_expired(now) {
            debug!(id = pending.record.id, "undo window closed");
            return Ok(UndoOutcome::Expired);
        }
        match store.create_transaction(owner, &NewTransaction::from(&pending.record)) {
            Ok(restored) => {
                info!(owner, old_id = pending.record.id, new_id = restored.id, "transaction restored");
                Ok(UndoOutcome::Restored(restored))
            }
            Err(e) => {
                self.pending = Some(pending);
                Err(e)
            }
        }
    }

    /// Timer expiry: purges the pending record once its deadline has passed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Option<Transaction> {
        match &self.pending {
            Some(p) if p.timer.is_expired(now) => self.pending.take().map(|p| p.record),
            _ => None,
        }
    }
}
