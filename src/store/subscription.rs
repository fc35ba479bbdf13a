//! Subscription handles.

use std::sync::Weak;

/// Identifier of a registered listener, unique per store.
pub type ListenerId = u64;

/// Listener bookkeeping a [`Subscription`] can reach without knowing the
/// store's state type.
pub(crate) trait ListenerRegistry: Send + Sync {
    fn remove_listener(&self, id: ListenerId) -> bool;
    fn has_listener(&self, id: ListenerId) -> bool;
}

/// Handle to a registered store listener.
///
/// Dropping the handle unsubscribes. The handle only holds a weak reference,
/// so it never keeps a discarded store alive.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<dyn ListenerRegistry>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, registry: Weak<dyn ListenerRegistry>) -> Self {
        Self { id, registry }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// True while the listener is registered with a live, undisposed store.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.has_listener(self.id))
    }

    /// Detach the listener now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.remove_listener(self.id) {
                tracing::trace!(listener = self.id, "listener unsubscribed");
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
