mod common;

use common::{FakeApi, test_retry};
use wayfinder::{
    WayfinderError,
    aggregate::fetch_all,
    types::{PageRequest, TrackEndpoint},
};

#[tokio::test]
async fn test_fetch_all_returns_every_item_in_order() {
    let api = FakeApi::with_library(120);
    let retry = test_retry();

    let collection = fetch_all(&api, &retry, TrackEndpoint::SavedTracks, 50)
        .await
        .unwrap();

    assert_eq!(collection.total(), 120);
    assert!(collection.is_complete());
    let ids: Vec<String> = collection
        .into_vec()
        .into_iter()
        .map(|item| item.track.id)
        .collect();
    let expected: Vec<String> = (0..120).map(|i| format!("track-{i}")).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_probe_then_one_call_per_page() {
    let api = FakeApi::with_library(120);
    let retry = test_retry();

    fetch_all(&api, &retry, TrackEndpoint::SavedTracks, 50)
        .await
        .unwrap();

    let mut calls = api.library_page_calls();
    assert_eq!(calls.remove(0), PageRequest::probe(TrackEndpoint::SavedTracks));
    let mut offsets: Vec<u32> = calls.iter().filter_map(|c| c.offset).collect();
    offsets.sort();
    assert_eq!(offsets, vec![0, 50, 100]);
    assert!(calls.iter().all(|c| c.limit == Some(50)));
}

#[tokio::test]
async fn test_failed_page_leaves_gap_without_shifting_indices() {
    let mut api = FakeApi::with_library(120);
    api.failing_offsets.insert(50);
    let retry = test_retry();

    let collection = fetch_all(&api, &retry, TrackEndpoint::SavedTracks, 50)
        .await
        .unwrap();

    assert_eq!(collection.len(), 70);
    assert!(!collection.is_complete());
    assert_eq!(collection.missing_indices(), (50..100).collect::<Vec<_>>());
    assert_eq!(collection.get(49).unwrap().track.id, "track-49");
    assert_eq!(collection.get(100).unwrap().track.id, "track-100");
    assert!(collection.get(50).is_none());

    assert_eq!(collection.failures().len(), 1);
    assert!(matches!(
        collection.failures()[0],
        WayfinderError::PageFailed { offset: 50, .. }
    ));

    // the failing page was retried through the whole budget
    let attempts_at_50 = api
        .library_page_calls()
        .iter()
        .filter(|c| c.offset == Some(50))
        .count();
    assert_eq!(attempts_at_50, 11);
}

#[tokio::test]
async fn test_empty_collection_only_probes() {
    let api = FakeApi::default();
    let retry = test_retry();

    let collection = fetch_all(&api, &retry, TrackEndpoint::SavedTracks, 50)
        .await
        .unwrap();

    assert!(collection.is_empty());
    assert_eq!(collection.total(), 0);
    assert_eq!(api.library_page_calls().len(), 1);
}

#[tokio::test]
async fn test_page_size_is_clamped_to_remote_limit() {
    let api = FakeApi::with_library(120);
    let retry = test_retry();

    let collection = fetch_all(&api, &retry, TrackEndpoint::SavedTracks, 500)
        .await
        .unwrap();

    assert_eq!(collection.len(), 120);
    assert!(
        api.library_page_calls()
            .iter()
            .skip(1)
            .all(|c| c.limit == Some(50))
    );
}
