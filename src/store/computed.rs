//! Computed-state binding.
//!
//! A [`ComputedBinder`] sits between the caller-supplied update and the raw
//! state write: the update is merged first, then the derivation runs against
//! the merged value and its output is folded into the same value. Callers of
//! the wrapped setter never recompute by hand, and subscribers never see raw
//! fields paired with stale derived fields.

use std::sync::Arc;

/// State types that carry fields derived from their own raw fields.
pub trait ComputedState: Sized {
    /// The derived part of the state.
    type Computed;

    /// Derive the computed fields from the current raw fields.
    fn compute(&self) -> Self::Computed;

    /// Return `self` with the computed fields replaced.
    fn with_computed(self, computed: Self::Computed) -> Self;
}

type Derivation<S> = dyn Fn(S) -> S + Send + Sync;

/// Wraps state updates so derived fields are recomputed in the same step.
pub struct ComputedBinder<S> {
    derive: Arc<Derivation<S>>,
}

impl<S> Clone for ComputedBinder<S> {
    fn clone(&self) -> Self {
        Self {
            derive: Arc::clone(&self.derive),
        }
    }
}

impl<S: 'static> ComputedBinder<S> {
    /// Bind an arbitrary derivation and merge function.
    pub fn new<C, D, M>(derive: D, merge: M) -> Self
    where
        D: Fn(&S) -> C + Send + Sync + 'static,
        M: Fn(S, C) -> S + Send + Sync + 'static,
    {
        Self {
            derive: Arc::new(move |state: S| {
                let computed = derive(&state);
                merge(state, computed)
            }),
        }
    }

    /// Re-derive computed fields of an already merged state.
    pub fn recompute(&self, state: S) -> S {
        (self.derive)(state)
    }

    /// Wrap a raw update: `next = derive(update(previous))`.
    pub fn wrap<'a, F>(&'a self, update: F) -> impl FnOnce(S) -> S + 'a
    where
        F: FnOnce(S) -> S + 'a,
    {
        move |previous| self.recompute(update(previous))
    }
}

impl<S: ComputedState + 'static> ComputedBinder<S> {
    /// Bind the state's own [`ComputedState`] derivation.
    pub fn for_state() -> Self {
        Self::new(S::compute, S::with_computed)
    }
}
