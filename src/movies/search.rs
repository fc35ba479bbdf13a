//! Search collaborator seam.
//!
//! The store treats the remote search API as an opaque async function that
//! yields exactly one result list (or one failure) per call.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use super::filter::contains_ignore_case;
use super::model::MovieItem;

/// Default number of items per catalog page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors surfaced by a search collaborator.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search for '{query}' (page {page}) failed: {message}")]
    Request {
        query: String,
        page: u32,
        message: String,
    },

    #[error("Failed to load catalog '{path}': {message}")]
    Catalog { path: PathBuf, message: String },
}

/// Remote movie search.
///
/// Implementations own any timeout or retry policy; the store never cancels
/// an in-flight call.
#[async_trait]
pub trait MovieSearch: Send + Sync {
    /// Fetch one page of results for `query`. Pages start at 1.
    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MovieItem>, SearchError>;
}

/// In-process catalog answering searches from a fixed movie list.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    movies: Vec<MovieItem>,
    page_size: usize,
}

impl StaticCatalog {
    pub fn new(movies: Vec<MovieItem>) -> Self {
        Self {
            movies,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size (values below 1 are clamped to 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Load a catalog from a JSON array of movies.
    pub fn from_json_file(path: &Path) -> Result<Self, SearchError> {
        let content = fs::read_to_string(path).map_err(|e| SearchError::Catalog {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let movies: Vec<MovieItem> =
            serde_json::from_str(&content).map_err(|e| SearchError::Catalog {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), movies = movies.len(), "catalog loaded");
        Ok(Self::new(movies))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[async_trait]
impl MovieSearch for StaticCatalog {
    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MovieItem>, SearchError> {
        // Page 0 is treated as the first page.
        let Some(skip) = (page.max(1) as usize - 1).checked_mul(self.page_size) else {
            tracing::debug!(query, page, "page past the end of the catalog");
            return Ok(Vec::new());
        };
        let results: Vec<MovieItem> = self
            .movies
            .iter()
            .filter(|movie| contains_ignore_case(movie.display_text(), query))
            .skip(skip)
            .take(self.page_size)
            .cloned()
            .collect();

        tracing::debug!(query, page, results = results.len(), "catalog search");
        Ok(results)
    }
}
