//! Movie data model: search results, raw state and derived state.

use serde::{Deserialize, Serialize};

/// One search result as produced by the search collaborator.
///
/// Treated as immutable once produced; the store only ever replaces whole
/// result sets, never edits items in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieItem {
    /// Stable identifier from the data source (e.g. an IMDb id).
    #[serde(default)]
    pub id: String,
    /// Display title, used for filtering and highlighting.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl MovieItem {
    /// Create an item with only a title (id derived from the title).
    pub fn titled(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: title.to_lowercase().replace(' ', "-"),
            title,
            year: None,
            poster: None,
        }
    }

    /// Text the filter engine matches against.
    pub fn display_text(&self) -> &str {
        &self.title
    }
}

/// Raw movie search state, the half of the view-model that is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieState {
    /// Last fetched result page. Replaced wholesale on each load.
    pub all_movies: Vec<MovieItem>,
    /// Last search query issued.
    pub search_by: String,
    /// Current free-text filter.
    pub filter_by: String,
}

/// Fields derived from [`MovieState`]; never mutated independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieComputedState {
    pub filtered_movies: Vec<MovieItem>,
}

/// Persisted form of [`MovieState`].
///
/// Fields missing from a stored snapshot keep the store's initial values
/// when it is restored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_movies: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<String>,
}

impl From<MovieState> for MovieSnapshot {
    fn from(state: MovieState) -> Self {
        Self {
            all_movies: Some(state.all_movies),
            search_by: Some(state.search_by),
            filter_by: Some(state.filter_by),
        }
    }
}
