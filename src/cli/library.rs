use tabled::Table;

use crate::{error, management::LibrarySnapshotManager, utils, warning};

/// Lists the saved tracks of the last snapshot, newest first.
///
/// Works offline. `search` filters by track, artist or genre.
pub async fn library(search: Option<String>, limit: Option<usize>) {
    let snapshot = match LibrarySnapshotManager::load().await {
        Ok(snapshot) => snapshot,
        Err(e) => error!(
            "No library snapshot found, run `wayfinder load` first. Err: {}",
            e
        ),
    };

    let mut tracks = snapshot.tracks().to_vec();
    if let Some(term) = search.as_deref() {
        tracks.retain(|track| utils::matches_search(track, term));
    }
    utils::sort_by_date_desc(&mut tracks);
    if let Some(limit) = limit {
        tracks.truncate(limit);
    }

    if tracks.is_empty() {
        warning!("No tracks found.");
        return;
    }

    println!("{}", Table::new(utils::track_rows(&tracks)));
}
