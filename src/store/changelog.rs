//! Change-log middleware.
//!
//! Records every transition in a bounded ring for inspection and emits one
//! debug event per transition. Purely observational: state and notification
//! timing are untouched.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;

use super::plugin::{StorePlugin, Transition};

/// Default number of retained transitions.
pub const DEFAULT_CHANGELOG_CAPACITY: usize = 100;

/// One recorded transition.
#[derive(Debug)]
pub struct ChangeRecord<S> {
    pub revision: u64,
    pub label: String,
    pub recorded_at: SystemTime,
    pub previous: Arc<S>,
    pub next: Arc<S>,
}

impl<S> Clone for ChangeRecord<S> {
    fn clone(&self) -> Self {
        Self {
            revision: self.revision,
            label: self.label.clone(),
            recorded_at: self.recorded_at,
            previous: Arc::clone(&self.previous),
            next: Arc::clone(&self.next),
        }
    }
}

pub struct ChangeLog<S> {
    store_name: String,
    capacity: usize,
    records: RwLock<VecDeque<ChangeRecord<S>>>,
}

impl<S> ChangeLog<S> {
    pub fn new(store_name: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            store_name: store_name.into(),
            capacity,
            records: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Retained records, oldest first.
    pub fn entries(&self) -> Vec<ChangeRecord<S>> {
        self.records.read().iter().cloned().collect()
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<ChangeRecord<S>> {
        self.records.read().back().cloned()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    fn push(&self, record: ChangeRecord<S>) {
        let mut records = self.records.write();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }
}

impl<S: Send + Sync> StorePlugin<S> for ChangeLog<S> {
    fn name(&self) -> &'static str {
        "changelog"
    }

    fn on_transition(&self, transition: &Transition<'_, S>) {
        tracing::debug!(
            store = %self.store_name,
            revision = transition.revision,
            action = transition.label,
            "state transition"
        );

        self.push(ChangeRecord {
            revision: transition.revision,
            label: transition.label.to_string(),
            recorded_at: SystemTime::now(),
            previous: Arc::clone(transition.previous),
            next: Arc::clone(transition.next),
        });
    }
}
