//! Shared test utilities and mock collaborators.

#![allow(dead_code, unused_imports)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use moviestore::config::Config;
use moviestore::movies::{MovieItem, MovieSearch, SearchError};
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio::sync::oneshot;

/// Build movies from titles.
pub fn movies(titles: &[&str]) -> Vec<MovieItem> {
    titles.iter().map(|title| MovieItem::titled(*title)).collect()
}

pub fn batman_movies() -> Vec<MovieItem> {
    movies(&["Batman Begins", "The Lego Batman Movie", "Batman Returns"])
}

/// Config with persistence off, so tests never touch the user's data dir.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.persistence.enabled = false;
    config
}

/// Config persisting into a fresh temporary directory.
pub fn persisted_config() -> (TempDir, Config) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.persistence.directory = Some(temp_dir.path().to_path_buf());
    (temp_dir, config)
}

/// Write `content` to a temporary `config.toml`.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

fn request_error(query: &str, page: u32, message: &str) -> SearchError {
    SearchError::Request {
        query: query.to_string(),
        page,
        message: message.to_string(),
    }
}

// -- Search mocks -------------------------------------------------------------

/// Answers every query with the same results and records each call.
pub struct RecordingSearch {
    results: Vec<MovieItem>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl RecordingSearch {
    pub fn new(results: Vec<MovieItem>) -> Arc<Self> {
        Arc::new(Self {
            results,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MovieSearch for RecordingSearch {
    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MovieItem>, SearchError> {
        self.calls.lock().push((query.to_string(), page));
        Ok(self.results.clone())
    }
}

/// Fails every request.
pub struct FailingSearch;

#[async_trait]
impl MovieSearch for FailingSearch {
    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MovieItem>, SearchError> {
        Err(request_error(query, page, "service unavailable"))
    }
}

pub type GateResult = Result<Vec<MovieItem>, String>;

/// Each query blocks until the test releases its gate.
///
/// Gates are registered per query before the search runs, so tests decide
/// the completion order of concurrent loads.
#[derive(Default)]
pub struct GatedSearch {
    gates: Mutex<HashMap<String, oneshot::Receiver<GateResult>>>,
}

impl GatedSearch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a gate for `query`; send on the returned handle to release it.
    pub fn gate(&self, query: &str) -> oneshot::Sender<GateResult> {
        let (sender, receiver) = oneshot::channel();
        self.gates.lock().insert(query.to_string(), receiver);
        sender
    }
}

#[async_trait]
impl MovieSearch for GatedSearch {
    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MovieItem>, SearchError> {
        let gate = self.gates.lock().remove(query);
        let Some(gate) = gate else {
            return Err(request_error(query, page, "no gate registered"));
        };
        match gate.await {
            Ok(Ok(movies)) => Ok(movies),
            Ok(Err(message)) => Err(request_error(query, page, &message)),
            Err(_) => Err(request_error(query, page, "gate dropped")),
        }
    }
}
