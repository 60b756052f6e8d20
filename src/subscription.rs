// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Push delivery of full snapshots to per-owner subscribers.
//!
//! A [`Subscription`] is a guard: dropping it unregisters the subscriber, so
//! a torn-down view or a signed-out user never receives another snapshot.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::debug;

use crate::error::SubscriptionError;
use crate::models::{Budget, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotEvent {
    Transactions(Vec<Transaction>),
    Budgets(Vec<Budget>),
}

struct Subscriber {
    id: u64,
    owner: String,
    tx: Sender<SnapshotEvent>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone, Default)]
pub struct SnapshotHub {
    registry: Arc<Mutex<Registry>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, owner: &str) -> Subscription {
        self.subscribe_with(owner, Vec::new())
    }

    /// Like [`SnapshotHub::subscribe`], with `initial` queued on the new
    /// subscription only. Existing subscribers see nothing.
    pub fn subscribe_with(&self, owner: &str, initial: Vec<SnapshotEvent>) -> Subscription {
        let (tx, rx) = mpsc::channel();
        for ev in initial {
            // `rx` is held below, so the channel is open.
            let _ = tx.send(ev);
        }
        let mut reg = lock(&self.registry);
        let id = reg.next_id;
        reg.next_id += 1;
        reg.subscribers.push(Subscriber {
            id,
            owner: owner.to_string(),
            tx,
        });
        debug!(owner, id, "subscribed to snapshots");
        Subscription {
            id,
            owner: owner.to_string(),
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn publish_transactions(&self, owner: &str, snapshot: &[Transaction]) {
        self.publish(owner, || SnapshotEvent::Transactions(snapshot.to_vec()));
    }

    pub fn publish_budgets(&self, owner: &str, snapshot: &[Budget]) {
        self.publish(owner, || SnapshotEvent::Budgets(snapshot.to_vec()));
    }

    fn publish(&self, owner: &str, event: impl Fn() -> SnapshotEvent) {
        let mut reg = lock(&self.registry);
        // Receivers that went away without unsubscribing are pruned here.
        reg.subscribers
            .retain(|s| s.owner != owner || s.tx.send(event()).is_ok());
    }

    /// Live subscribers for `owner`.
    pub fn subscriber_count(&self, owner: &str) -> usize {
        lock(&self.registry)
            .subscribers
            .iter()
            .filter(|s| s.owner == owner)
            .count()
    }
}

pub struct Subscription {
    id: u64,
    owner: String,
    rx: Receiver<SnapshotEvent>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Next queued snapshot, if any.
    pub fn try_next(&self) -> Result<Option<SnapshotEvent>, SubscriptionError> {
        match self.rx.try_recv() {
            Ok(ev) => Ok(Some(ev)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    /// All queued snapshots in arrival order. Snapshots delivered before the
    /// channel closed are still returned; the closure surfaces on the next call.
    pub fn drain(&self) -> Result<Vec<SnapshotEvent>, SubscriptionError> {
        let mut out = Vec::new();
        loop {
            match self.try_next() {
                Ok(Some(ev)) => out.push(ev),
                Ok(None) => break,
                Err(e) if out.is_empty() => return Err(e),
                Err(_) => break,
            }
        }
        Ok(out)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).subscribers.retain(|s| s.id != self.id);
            debug!(owner = %self.owner, id = self.id, "released snapshot subscription");
        }
    }
}
