//! Framework-agnostic bridge from the movie store to a presentation layer.
//!
//! A host constructs one [`MoviesAdapter`] per view, pulls view-models from
//! [`MoviesAdapter::vm_stream`] and calls actions through
//! [`MoviesAdapter::store`]. Dropping the adapter tears the store down.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::store::{MoviesStore, StoreError, DEFAULT_PAGE};
use crate::store::Subscription;
use crate::ui::search::MovieViewModel;

type InitialLoad = JoinHandle<Result<usize, StoreError>>;

pub struct MoviesAdapter {
    store: MoviesStore,
    initial_load: Mutex<Option<InitialLoad>>,
    // Subscribed before the initial load is spawned; handed to the first
    // `vm_stream()` caller so it cannot miss the load's snapshot.
    primed: Mutex<Option<ViewModelStream>>,
}

impl MoviesAdapter {
    /// Wrap `store` and start loading results for its current query.
    ///
    /// Must be called from within a Tokio runtime. A failed initial load is
    /// logged and leaves the state untouched.
    pub fn new(store: MoviesStore) -> Self {
        let primed = subscribe_stream(&store);
        let search_by = store.snapshot().search_by.clone();
        let loader = store.clone();

        let handle = tokio::spawn(async move {
            let result = loader.load_movies(&search_by, DEFAULT_PAGE).await;
            match &result {
                Ok(_) => {}
                Err(StoreError::Disposed) => {
                    tracing::debug!(search_by = %search_by, "adapter disposed before initial load");
                }
                Err(e) => {
                    tracing::warn!(search_by = %search_by, error = %e, "initial movie load failed");
                }
            }
            result
        });

        Self {
            store,
            initial_load: Mutex::new(Some(handle)),
            primed: Mutex::new(Some(primed)),
        }
    }

    /// Store handle for issuing actions.
    pub fn store(&self) -> &MoviesStore {
        &self.store
    }

    /// Stream of published view-models.
    ///
    /// The first call yields every snapshot since the adapter was built,
    /// including the one written by the initial load. Later calls yield
    /// snapshots published after the call. All streams observe the same
    /// snapshots in the same order.
    pub fn vm_stream(&self) -> ViewModelStream {
        let primed = self.primed.lock().take();
        primed.unwrap_or_else(|| subscribe_stream(&self.store))
    }

    /// Wait for the initial load started by [`MoviesAdapter::new`].
    ///
    /// Returns `None` if it was already awaited or the task panicked.
    pub async fn initial_load(&self) -> Option<Result<usize, StoreError>> {
        let handle = self.initial_load.lock().take()?;
        match handle.await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(error = %e, "initial load task failed");
                None
            }
        }
    }

    /// Dispose the store. Every live stream ends. Idempotent.
    pub fn dispose(&self) {
        self.store.dispose();
    }
}

fn subscribe_stream(store: &MoviesStore) -> ViewModelStream {
    let (sender, receiver) = mpsc::unbounded_channel();
    let subscription = store.subscribe(move |vm| {
        // Receiver gone: the stream is being dropped and will
        // unsubscribe on its own.
        let _ = sender.send(Arc::clone(vm));
    });

    ViewModelStream {
        receiver,
        subscription: Some(subscription),
    }
}

impl Drop for MoviesAdapter {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Stream of view-model snapshots for one subscriber.
///
/// Ends once the stream is unsubscribed or the store is disposed; snapshots
/// still buffered at that point are discarded.
pub struct ViewModelStream {
    receiver: mpsc::UnboundedReceiver<Arc<MovieViewModel>>,
    subscription: Option<Subscription>,
}

impl ViewModelStream {
    pub fn is_active(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// Detach from the store. Other streams are unaffected.
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Stream for ViewModelStream {
    type Item = Arc<MovieViewModel>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if !this.is_active() {
            this.receiver.close();
            return Poll::Ready(None);
        }
        this.receiver.poll_recv(cx)
    }
}
