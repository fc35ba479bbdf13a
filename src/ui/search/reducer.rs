use crate::ui::mvi::Reducer;
use crate::ui::search::intent::MovieIntent;
use crate::ui::search::state::MovieViewModel;

/// Applies movie intents to the raw view-model fields.
///
/// Derived fields are not touched here; the store re-derives them after every
/// reduction.
pub struct MovieReducer;

impl Reducer for MovieReducer {
    type State = MovieViewModel;
    type Intent = MovieIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            MovieIntent::MoviesLoaded { search_by, movies } => MovieViewModel {
                all_movies: movies,
                search_by,
                ..state
            },
            MovieIntent::FilterChanged { filter_by } => MovieViewModel { filter_by, ..state },
            MovieIntent::FilterCleared => MovieViewModel {
                filter_by: String::new(),
                ..state
            },
        }
    }
}
