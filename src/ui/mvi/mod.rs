//! Model-View-Intent primitives shared by every store.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Subscribers
//!    ↑                                 │
//!    └─────────────────────────────────┘
//! ```
//!
//! A state value is never edited in place: reducers take the previous state
//! by value and return the next one, and the store publishes it as a fresh
//! snapshot.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
