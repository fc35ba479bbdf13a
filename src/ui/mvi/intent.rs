//! Base trait for intents.

/// An action applied to a store through a [`Reducer`](super::Reducer).
///
/// Either a user action (typing a filter, clearing it) or a system event
/// (a search response arriving).
pub trait Intent: Send + 'static {
    /// Short action name recorded by the change log, e.g. `"updateFilter"`.
    fn label(&self) -> &'static str;
}
