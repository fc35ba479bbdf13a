use crate::movies::MovieItem;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum MovieIntent {
    /// A search completed; replaces the result set and records the query.
    /// The active filter is left untouched.
    MoviesLoaded {
        search_by: String,
        movies: Vec<MovieItem>,
    },
    FilterChanged { filter_by: String },
    FilterCleared,
}

impl Intent for MovieIntent {
    fn label(&self) -> &'static str {
        match self {
            Self::MoviesLoaded { .. } => "loadMovies",
            Self::FilterChanged { .. } => "updateFilter",
            Self::FilterCleared => "clearFilter",
        }
    }
}
