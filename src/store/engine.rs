//! Generic state container with derived fields, middleware and subscriptions.
//!
//! The store owns the canonical state as an `Arc<S>` snapshot. Every write
//! produces a brand new snapshot from the previous one, so snapshots already
//! handed to subscribers are never mutated and can be compared by pointer.
//!
//! A transition runs in this order:
//! 1. the caller's update (or reducer) on a copy of the previous state
//! 2. the computed binder, re-deriving computed fields
//! 3. the swap of the canonical snapshot
//! 4. plugin `on_transition` hooks, in registration order
//! 5. listeners, in subscription order
//!
//! A transition started by a listener is published immediately but delivered
//! only after the current delivery round finishes, so every listener sees
//! snapshots in revision order.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use super::computed::ComputedBinder;
use super::plugin::{StorePlugin, Transition};
use super::subscription::{ListenerId, ListenerRegistry, Subscription};
use crate::ui::mvi::{Intent, Reducer, UiState};

type Listener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Shared handle to a store. Clones refer to the same canonical state.
pub struct Store<S: UiState> {
    inner: Arc<StoreInner<S>>,
}

impl<S: UiState> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<S> {
    name: String,
    state: RwLock<Arc<S>>,
    revision: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener<S>)>>,
    next_listener_id: AtomicU64,
    plugins: Vec<Arc<dyn StorePlugin<S>>>,
    binder: Option<ComputedBinder<S>>,
    // Serializes transitions and their notifications. Re-entrant so a
    // listener may dispatch from inside a notification.
    dispatch_lock: ReentrantMutex<()>,
    // Snapshots awaiting delivery, drained by the outermost transition.
    pending: Mutex<VecDeque<Arc<S>>>,
    delivering: AtomicBool,
    disposed: AtomicBool,
}

/// Clears the delivering flag even if a listener panics.
struct DeliveryGuard<'a>(&'a AtomicBool);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<S: UiState> ListenerRegistry for StoreInner<S> {
    fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = {
            let mut listeners = self.listeners.lock();
            listeners
                .iter()
                .position(|(listener_id, _)| *listener_id == id)
                .map(|index| listeners.remove(index))
        };
        // Dropped outside the lock: a listener may own another subscription.
        removed.is_some()
    }

    fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners
            .lock()
            .iter()
            .any(|(listener_id, _)| *listener_id == id)
    }
}

/// Builder for [`Store`]. Plugins are registered outermost first.
pub struct StoreBuilder<S: UiState> {
    name: String,
    initial: S,
    binder: Option<ComputedBinder<S>>,
    plugins: Vec<Arc<dyn StorePlugin<S>>>,
}

impl<S: UiState> StoreBuilder<S> {
    pub fn new(name: impl Into<String>, initial: S) -> Self {
        Self {
            name: name.into(),
            initial,
            binder: None,
            plugins: Vec::new(),
        }
    }

    /// Re-derive computed fields on every write (and once at build time).
    pub fn computed(mut self, binder: ComputedBinder<S>) -> Self {
        self.binder = Some(binder);
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn StorePlugin<S>>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn build(self) -> Store<S> {
        let mut state = self.initial;
        for plugin in self.plugins.iter().rev() {
            state = plugin.on_init(state);
            tracing::trace!(store = %self.name, plugin = plugin.name(), "plugin initialized");
        }
        if let Some(binder) = &self.binder {
            state = binder.recompute(state);
        }

        tracing::debug!(
            store = %self.name,
            plugins = self.plugins.len(),
            computed = self.binder.is_some(),
            "store created"
        );

        Store {
            inner: Arc::new(StoreInner {
                name: self.name,
                state: RwLock::new(Arc::new(state)),
                revision: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(1),
                plugins: self.plugins,
                binder: self.binder,
                dispatch_lock: ReentrantMutex::new(()),
                pending: Mutex::new(VecDeque::new()),
                delivering: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
            }),
        }
    }
}

impl<S: UiState> Store<S> {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current snapshot. Cheap: clones the `Arc`, not the state.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&self.inner.state.read())
    }

    /// Number of transitions published so far.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Produce the next state from an owned copy of the previous one.
    ///
    /// Computed fields are re-derived before the new snapshot is published,
    /// so the transition yields exactly one notification per listener.
    /// Returns `false` without writing when the store has been disposed.
    pub fn set_state<F>(&self, label: &str, update: F) -> bool
    where
        F: FnOnce(S) -> S,
    {
        let _span = tracing::debug_span!("set_state", store = %self.inner.name, action = label)
            .entered();
        let _dispatch = self.inner.dispatch_lock.lock();

        if self.is_disposed() {
            tracing::debug!("store disposed, update dropped");
            return false;
        }

        let previous = self.get_state();
        let seed = S::clone(&previous);
        let next = match &self.inner.binder {
            Some(binder) => binder.wrap(update)(seed),
            None => update(seed),
        };
        let next = Arc::new(next);

        *self.inner.state.write() = Arc::clone(&next);
        let revision = self.inner.revision.fetch_add(1, Ordering::SeqCst) + 1;

        let transition = Transition {
            revision,
            label,
            previous: &previous,
            next: &next,
        };
        for plugin in &self.inner.plugins {
            plugin.on_transition(&transition);
        }

        self.inner.pending.lock().push_back(next);
        self.deliver_pending();
        true
    }

    /// Run `intent` through reducer `R` as one transition.
    pub fn dispatch<R>(&self, intent: R::Intent) -> bool
    where
        R: Reducer<State = S>,
    {
        let label = <R::Intent as Intent>::label(&intent);
        self.set_state(label, move |state| R::reduce(state, intent))
    }

    /// Register a listener for every subsequent snapshot.
    ///
    /// Subscribing to a disposed store returns an inactive handle.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Arc<S>) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut listeners = self.inner.listeners.lock();
            if !self.is_disposed() {
                listeners.push((id, Arc::new(listener)));
            }
        }

        let registry: Arc<dyn ListenerRegistry> = self.inner.clone();
        Subscription::new(id, Arc::downgrade(&registry))
    }

    /// Stop accepting writes and release every listener. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let released = std::mem::take(&mut *self.inner.listeners.lock());
        self.inner.pending.lock().clear();
        tracing::debug!(
            store = %self.inner.name,
            listeners = released.len(),
            revision = self.revision(),
            "store disposed"
        );
    }

    /// Deliver queued snapshots in order. Nested calls (a listener writing
    /// to the store) only enqueue; the outermost call drains the queue.
    fn deliver_pending(&self) {
        if self.inner.delivering.swap(true, Ordering::SeqCst) {
            return;
        }
        let _guard = DeliveryGuard(&self.inner.delivering);

        // Not `while let`: the queue lock must be released before delivery.
        loop {
            let Some(snapshot) = self.inner.pending.lock().pop_front() else {
                break;
            };
            self.notify(&snapshot);
        }
    }

    fn notify(&self, snapshot: &Arc<S>) {
        let listeners: Vec<(ListenerId, Listener<S>)> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in listeners {
            // A listener may unsubscribe another one (or dispose the store)
            // while this notification is being delivered.
            if self.is_disposed() {
                break;
            }
            if !self.inner.has_listener(id) {
                continue;
            }
            listener(snapshot);
        }
    }
}
