//! Generic reactive store.
//!
//! ```text
//! set_state / dispatch
//!        │
//!        ▼
//!   update(prev) ──→ ComputedBinder ──→ snapshot swap
//!                                            │
//!                       plugins (changelog, persist) ──→ listeners
//! ```

mod changelog;
mod computed;
mod engine;
mod persist;
mod plugin;
mod subscription;

pub use changelog::{ChangeLog, ChangeRecord, DEFAULT_CHANGELOG_CAPACITY};
pub use computed::{ComputedBinder, ComputedState};
pub use engine::{Store, StoreBuilder};
pub use persist::{
    JsonFileStorage, MemoryStorage, PersistError, PersistPlugin, Persistable, SnapshotStorage,
};
pub use plugin::{StorePlugin, Transition};
pub use subscription::{ListenerId, Subscription};
