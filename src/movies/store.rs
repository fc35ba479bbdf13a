//! Movie search store: owns the movie view-model and its actions.

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;

use super::model::MovieState;
use super::search::{MovieSearch, SearchError};
use crate::config::Config;
use crate::store::{
    ChangeLog, ComputedBinder, JsonFileStorage, PersistPlugin, SnapshotStorage, Store,
    StoreBuilder, Subscription,
};
use crate::ui::search::{MovieIntent, MovieReducer, MovieViewModel};

/// Page requested when the caller doesn't ask for one.
pub const DEFAULT_PAGE: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Store was disposed before the operation completed")]
    Disposed,
}

/// Movie search store.
///
/// Clones share the same state. Actions may be called from any task; results
/// of concurrent loads are applied in completion order, so the last load to
/// finish wins regardless of which one was issued last.
#[derive(Clone)]
pub struct MoviesStore {
    store: Store<MovieViewModel>,
    search: Arc<dyn MovieSearch>,
    changelog: Option<Arc<ChangeLog<MovieViewModel>>>,
}

impl MoviesStore {
    /// Build a store persisting to the configured directory.
    ///
    /// Falls back to an unpersisted store if the directory can't be opened.
    pub fn new(search: Arc<dyn MovieSearch>, config: &Config) -> Self {
        let storage: Option<Arc<dyn SnapshotStorage>> = if config.persistence.enabled {
            let directory = config.persistence.storage_directory();
            match JsonFileStorage::new(&directory) {
                Ok(storage) => Some(Arc::new(storage)),
                Err(e) => {
                    tracing::warn!(
                        directory = %directory.display(),
                        error = %e,
                        "snapshot storage unavailable, persistence disabled"
                    );
                    None
                }
            }
        } else {
            None
        };

        Self::build(search, config, storage)
    }

    /// Build a store persisting to `storage`, regardless of
    /// `persistence.enabled`.
    pub fn with_storage(
        search: Arc<dyn MovieSearch>,
        config: &Config,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Self {
        Self::build(search, config, Some(storage))
    }

    /// Build a store without persistence.
    pub fn ephemeral(search: Arc<dyn MovieSearch>, config: &Config) -> Self {
        Self::build(search, config, None)
    }

    fn build(
        search: Arc<dyn MovieSearch>,
        config: &Config,
        storage: Option<Arc<dyn SnapshotStorage>>,
    ) -> Self {
        let initial = MovieViewModel::from_state(MovieState {
            search_by: config.store.default_query.clone(),
            ..MovieState::default()
        });

        let changelog = config
            .changelog
            .enabled
            .then(|| Arc::new(ChangeLog::new(&config.store.name, config.changelog.capacity)));

        // Change log outermost, persistence innermost.
        let mut builder = StoreBuilder::new(&config.store.name, initial)
            .computed(ComputedBinder::for_state());
        if let Some(changelog) = &changelog {
            builder = builder.plugin(changelog.clone());
        }
        if let Some(storage) = storage {
            let persist = PersistPlugin::new(&config.persistence.key, storage)
                .with_version(config.persistence.version);
            builder = builder.plugin(Arc::new(persist));
        }

        Self {
            store: builder.build(),
            search,
            changelog,
        }
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    /// Current view-model snapshot.
    pub fn snapshot(&self) -> Arc<MovieViewModel> {
        self.store.get_state()
    }

    /// Number of transitions applied so far.
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Register a listener for every subsequent view-model.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Arc<MovieViewModel>) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.store.listener_count()
    }

    /// Recorded transitions, when the change log is enabled.
    pub fn changelog(&self) -> Option<&Arc<ChangeLog<MovieViewModel>>> {
        self.changelog.as_ref()
    }

    /// Fetch one page of results for `search_by` and replace the result set.
    ///
    /// Writes `all_movies` and `search_by` in one transition, leaving the
    /// filter as is. On failure nothing is written. Returns the number of
    /// movies loaded.
    pub async fn load_movies(&self, search_by: &str, page: u32) -> Result<usize, StoreError> {
        let span = tracing::debug_span!("load_movies", store = %self.name(), search_by, page);
        async move {
            let movies = self.search.search_movies(search_by, page).await?;
            let count = movies.len();

            let applied = self.store.dispatch::<MovieReducer>(MovieIntent::MoviesLoaded {
                search_by: search_by.to_string(),
                movies,
            });
            if !applied {
                tracing::debug!("store disposed while loading, results dropped");
                return Err(StoreError::Disposed);
            }

            tracing::debug!(movies = count, "movies loaded");
            Ok(count)
        }
        .instrument(span)
        .await
    }

    /// Set the free-text filter. Returns `false` once disposed.
    pub fn update_filter(&self, filter_by: &str) -> bool {
        self.store.dispatch::<MovieReducer>(MovieIntent::FilterChanged {
            filter_by: filter_by.to_string(),
        })
    }

    /// Reset the filter to empty. Returns `false` once disposed.
    pub fn clear_filter(&self) -> bool {
        self.store.dispatch::<MovieReducer>(MovieIntent::FilterCleared)
    }

    /// Release every listener and refuse further writes. Idempotent.
    pub fn dispose(&self) {
        self.store.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.store.is_disposed()
    }
}
