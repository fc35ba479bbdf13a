mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{batman_movies, test_config, FailingSearch, GatedSearch, RecordingSearch};
use futures_util::StreamExt;
use moviestore::movies::{MoviesAdapter, MoviesStore, StoreError};
use moviestore::store::{MemoryStorage, SnapshotStorage};
use tokio::time::timeout;

fn adapter_with(search: Arc<RecordingSearch>, default_query: &str) -> MoviesAdapter {
    let mut config = test_config();
    config.store.default_query = default_query.to_string();
    MoviesAdapter::new(MoviesStore::ephemeral(search, &config))
}

#[tokio::test]
async fn construction_loads_current_query_once() {
    let search = RecordingSearch::new(batman_movies());
    let adapter = adapter_with(search.clone(), "batman");

    let result = adapter.initial_load().await;

    assert!(matches!(result, Some(Ok(3))));
    assert_eq!(search.calls(), vec![("batman".to_string(), 1)]);
    assert_eq!(adapter.store().snapshot().all_movies, batman_movies());
    // Already awaited.
    assert!(adapter.initial_load().await.is_none());
}

#[tokio::test]
async fn failed_initial_load_leaves_state_untouched() {
    let adapter = MoviesAdapter::new(MoviesStore::ephemeral(
        Arc::new(FailingSearch),
        &test_config(),
    ));

    let result = adapter.initial_load().await;

    assert!(matches!(result, Some(Err(StoreError::Search(_)))));
    assert_eq!(adapter.store().revision(), 0);
    assert!(!adapter.store().is_disposed());
}

#[tokio::test]
async fn first_stream_yields_load_then_later_snapshots() {
    let adapter = adapter_with(RecordingSearch::new(batman_movies()), "batman");
    adapter.initial_load().await;
    let mut stream = adapter.vm_stream();

    adapter.store().update_filter("lego");
    adapter.store().clear_filter();

    let loaded = stream.next().await.unwrap();
    assert_eq!(loaded.all_movies, batman_movies());
    let filtered = stream.next().await.unwrap();
    assert_eq!(filtered.filter_by, "lego");
    assert_eq!(filtered.filtered_movies.len(), 1);
    let cleared = stream.next().await.unwrap();
    assert_eq!(cleared.filter_by, "");
    assert_eq!(cleared.filtered_movies.len(), 3);
}

#[tokio::test]
async fn later_streams_start_at_subscription() {
    let adapter = adapter_with(RecordingSearch::new(batman_movies()), "batman");
    adapter.initial_load().await;
    let _first = adapter.vm_stream();
    let mut second = adapter.vm_stream();

    adapter.store().update_filter("returns");

    assert_eq!(second.next().await.unwrap().filter_by, "returns");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stream_sees_initial_load_result() {
    for _ in 0..50 {
        let adapter = adapter_with(RecordingSearch::new(batman_movies()), "batman");
        let mut stream = adapter.vm_stream();

        let vm = timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("initial load snapshot not delivered")
            .unwrap();
        assert_eq!(vm.search_by, "batman");
        assert_eq!(vm.all_movies, batman_movies());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stream_taken_after_load_still_sees_it() {
    let adapter = adapter_with(RecordingSearch::new(batman_movies()), "batman");
    adapter.initial_load().await;

    let mut stream = adapter.vm_stream();
    let vm = timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("initial load snapshot not delivered")
        .unwrap();
    assert_eq!(vm.all_movies, batman_movies());
}

#[tokio::test]
async fn initial_load_uses_restored_query() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .save("movieSearch", r#"{"state":{"searchBy":"alien"},"version":0}"#)
        .unwrap();
    let search = RecordingSearch::new(batman_movies());
    let mut config = test_config();
    config.store.default_query = "batman".to_string();

    let adapter = MoviesAdapter::new(MoviesStore::with_storage(
        search.clone(),
        &config,
        storage,
    ));
    adapter.initial_load().await;

    assert_eq!(search.calls(), vec![("alien".to_string(), 1)]);
    assert_eq!(adapter.store().snapshot().search_by, "alien");
}

#[tokio::test]
async fn streams_share_snapshots() {
    let adapter = adapter_with(RecordingSearch::new(batman_movies()), "");
    adapter.initial_load().await;
    let mut first = adapter.vm_stream();
    let mut second = adapter.vm_stream();

    adapter.store().update_filter("returns");

    // The first stream also carries the initial load.
    first.next().await.unwrap();
    let a = first.next().await.unwrap();
    let b = second.next().await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn unsubscribing_one_stream_leaves_others() {
    let adapter = adapter_with(RecordingSearch::new(batman_movies()), "");
    adapter.initial_load().await;
    let mut first = adapter.vm_stream();
    let mut second = adapter.vm_stream();

    first.unsubscribe();
    adapter.store().update_filter("begins");

    assert!(!first.is_active());
    assert!(first.next().await.is_none());
    assert_eq!(second.next().await.unwrap().filter_by, "begins");
    assert_eq!(adapter.store().listener_count(), 1);
}

#[tokio::test]
async fn dropping_a_stream_unsubscribes() {
    let adapter = adapter_with(RecordingSearch::new(batman_movies()), "");
    adapter.initial_load().await;

    let stream = adapter.vm_stream();
    assert_eq!(adapter.store().listener_count(), 1);
    drop(stream);
    assert_eq!(adapter.store().listener_count(), 0);
}

#[tokio::test]
async fn dispose_ends_streams_and_discards_buffer() {
    let adapter = adapter_with(RecordingSearch::new(batman_movies()), "");
    adapter.initial_load().await;
    let mut stream = adapter.vm_stream();

    adapter.store().update_filter("buffered");
    adapter.dispose();

    assert!(stream.next().await.is_none());
    assert!(!adapter.store().update_filter("after"));
}

#[tokio::test]
async fn dropping_adapter_disposes_store() {
    let adapter = adapter_with(RecordingSearch::new(batman_movies()), "");
    adapter.initial_load().await;
    let store = adapter.store().clone();
    let mut stream = adapter.vm_stream();

    drop(adapter);

    assert!(store.is_disposed());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn initial_load_finishing_after_dispose_writes_nothing() {
    let search = GatedSearch::new();
    let gate = search.gate("");
    let adapter = MoviesAdapter::new(MoviesStore::ephemeral(search, &test_config()));

    adapter.dispose();
    gate.send(Ok(batman_movies())).unwrap();

    assert!(matches!(
        adapter.initial_load().await,
        Some(Err(StoreError::Disposed))
    ));
    assert!(adapter.store().snapshot().all_movies.is_empty());
}
