//! Reducer trait: the pure half of every store transition.

use super::intent::Intent;
use super::state::UiState;

/// Maps `(state, intent)` to the next state.
///
/// Reducers own no data and perform no I/O; the store runs them on an owned
/// copy of the previous snapshot and publishes the result. Derived fields are
/// left to the store's computed binder.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;

    /// Fold a sequence of intents, oldest first.
    fn replay<I>(state: Self::State, intents: I) -> Self::State
    where
        I: IntoIterator<Item = Self::Intent>,
    {
        intents.into_iter().fold(state, Self::reduce)
    }
}
