//! Cross-cutting store middleware.
//!
//! Plugins are registered in order, outermost first, when the store is built.
//! They may seed the initial state and observe every transition, but they
//! never rewrite a transition once it has been published.

use std::sync::Arc;

/// One published state transition.
pub struct Transition<'a, S> {
    /// Monotonic transition counter; the first transition is revision 1.
    pub revision: u64,
    /// Action label, e.g. `"updateFilter"`.
    pub label: &'a str,
    pub previous: &'a Arc<S>,
    pub next: &'a Arc<S>,
}

pub trait StorePlugin<S>: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Runs once while the store is built and may replace the initial state.
    ///
    /// Plugins run innermost first, so the outermost plugin sees the final
    /// seed. Derived fields are recomputed after all plugins have run.
    fn on_init(&self, state: S) -> S {
        state
    }

    /// Runs after every transition, before subscribers are notified.
    fn on_transition(&self, _transition: &Transition<'_, S>) {}
}
