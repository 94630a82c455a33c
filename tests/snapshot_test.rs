use tempfile::TempDir;
use wayfinder::{WayfinderError, management::LibrarySnapshotManager, types::VizTrack};

fn track(id: &str) -> VizTrack {
    VizTrack {
        id: id.to_string(),
        name: format!("Song {id}"),
        date: Some("2024-01-01T00:00:00Z".to_string()),
        artists: vec!["Someone".to_string()],
        genres: Some(vec!["ambient".to_string()]),
        energy: Some(0.25),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_snapshot_reloads_without_network() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache/library.json.z");
    let tracks = vec![track("a"), track("b")];

    LibrarySnapshotManager::with_path(path.clone(), tracks.clone())
        .persist()
        .await
        .unwrap();

    let raw = std::fs::read(&path).unwrap();
    assert!(serde_json::from_slice::<serde_json::Value>(&raw).is_err());

    let loaded = LibrarySnapshotManager::load_from(path).await.unwrap();
    assert_eq!(loaded.tracks(), &tracks[..]);
}

#[tokio::test]
async fn test_corrupt_snapshot_is_a_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json.z");
    std::fs::write(&path, b"definitely not zlib").unwrap();

    let result = LibrarySnapshotManager::load_from(path).await;
    assert!(matches!(result, Err(WayfinderError::Storage(_))));
}

#[tokio::test]
async fn test_missing_snapshot_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = LibrarySnapshotManager::load_from(dir.path().join("nope")).await;
    assert!(matches!(result, Err(WayfinderError::Io(_))));
}
