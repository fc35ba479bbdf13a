use crate::movies::compute_matched_movies;
use crate::movies::{MovieComputedState, MovieItem, MovieSnapshot, MovieState};
use crate::store::{ComputedState, Persistable};
use crate::ui::mvi::UiState;

/// Combined raw + derived movie search state handed to subscribers.
///
/// A new value is produced on every transition; subscribers receive it behind
/// an `Arc` and may keep it around indefinitely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieViewModel {
    pub all_movies: Vec<MovieItem>,
    pub search_by: String,
    pub filter_by: String,
    /// Derived: `all_movies` narrowed by `filter_by`.
    pub filtered_movies: Vec<MovieItem>,
}

impl UiState for MovieViewModel {}

impl MovieViewModel {
    /// Build a view-model from raw state, deriving the computed fields.
    pub fn from_state(state: MovieState) -> Self {
        let vm = Self {
            all_movies: state.all_movies,
            search_by: state.search_by,
            filter_by: state.filter_by,
            filtered_movies: Vec::new(),
        };
        let computed = vm.compute();
        vm.with_computed(computed)
    }

    /// Raw (persisted) half of the view-model.
    pub fn raw_state(&self) -> MovieState {
        MovieState {
            all_movies: self.all_movies.clone(),
            search_by: self.search_by.clone(),
            filter_by: self.filter_by.clone(),
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.filter_by.is_empty()
    }
}

impl ComputedState for MovieViewModel {
    type Computed = MovieComputedState;

    fn compute(&self) -> MovieComputedState {
        MovieComputedState {
            filtered_movies: compute_matched_movies(&self.all_movies, &self.filter_by),
        }
    }

    fn with_computed(self, computed: MovieComputedState) -> Self {
        Self {
            filtered_movies: computed.filtered_movies,
            ..self
        }
    }
}

impl Persistable for MovieViewModel {
    type Snapshot = MovieSnapshot;

    fn to_snapshot(&self) -> MovieSnapshot {
        MovieSnapshot::from(self.raw_state())
    }

    fn restore(self, snapshot: MovieSnapshot) -> Self {
        // Computed fields are re-derived by the store's binder after restore.
        Self {
            all_movies: snapshot.all_movies.unwrap_or(self.all_movies),
            search_by: snapshot.search_by.unwrap_or(self.search_by),
            filter_by: snapshot.filter_by.unwrap_or(self.filter_by),
            filtered_movies: self.filtered_movies,
        }
    }
}
