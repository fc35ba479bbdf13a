//! Base trait for store state.

/// Marker trait for state held by a [`Store`](crate::store::Store).
///
/// Snapshots are shared behind `Arc` with every subscriber, hence `Sync`.
/// `Default` provides the initial value before configuration seeds it, and
/// `PartialEq` lets tests and hosts compare snapshots by value.
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}
