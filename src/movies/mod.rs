//! Movie search domain: data model, filter engine, search seam, the store
//! that ties them together and the adapter exposing it to a UI.

mod adapter;
mod filter;
mod model;
mod search;
mod store;

pub use adapter::{MoviesAdapter, ViewModelStream};
pub use filter::{compute_matched_movies, contains_ignore_case, highlight_ranges};
pub use model::{MovieComputedState, MovieItem, MovieSnapshot, MovieState};
pub use search::{MovieSearch, SearchError, StaticCatalog, DEFAULT_PAGE_SIZE};
pub use store::{MoviesStore, StoreError, DEFAULT_PAGE};
