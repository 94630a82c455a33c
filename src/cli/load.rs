use std::path::{Path, PathBuf};

use tabled::Table;

use crate::{
    aggregate::GenreMode,
    config::EngineConfig,
    error,
    management::{FileStore, LibrarySnapshotManager, SessionManager},
    session, success,
    types::Dataset,
    utils, warning,
};

/// Loads the complete listening history.
///
/// Resolves the session (refreshing if needed), runs the aggregation, stores
/// the library snapshot and optionally writes the whole dataset as JSON to
/// `output`. Any fatal failure ends in a visible error with exit code 1.
pub async fn load(output: Option<PathBuf>, positional_genres: bool) {
    let mut config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid engine configuration: {}", e),
    };
    if positional_genres {
        config.genre_mode = GenreMode::Positional;
    }

    let store = SessionManager::new(FileStore::default());
    let context = match session::ensure_session(&store).await {
        Ok(context) => context,
        Err(e) => error!("{}", e),
    };

    let pb = utils::spinner("Loading listening history...");
    let report = match session::run(&context, &config).await {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to load listening history: {}", e);
        }
    };
    pb.finish_and_clear();

    if !report.is_complete() {
        warning!(
            "{} library pages could not be fetched and were left out",
            report.failures.len()
        );
        for failure in &report.failures {
            log::warn!("{failure}");
        }
    }

    let dataset = report.dataset;
    let snapshot = LibrarySnapshotManager::new(dataset.library.clone());
    if let Err(e) = snapshot.persist().await {
        warning!("Failed to write library snapshot: {}", e);
    }

    if let Some(path) = output {
        if let Err(e) = write_dataset(&path, &dataset).await {
            error!("Failed to write {}: {}", path.display(), e);
        }
        success!("Wrote dataset to {}", path.display());
    }

    summarize(&dataset);
}

async fn write_dataset(path: &Path, dataset: &Dataset) -> crate::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        async_fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(dataset)?;
    async_fs::write(path, json).await?;
    Ok(())
}

fn summarize(dataset: &Dataset) {
    let name = dataset
        .profile
        .display_name
        .as_deref()
        .unwrap_or(&dataset.profile.id);
    success!(
        "Loaded {} saved tracks and {} recently played for {}",
        dataset.library.len(),
        dataset.recently_played.len(),
        name
    );

    let artists = utils::artist_rows(&dataset.top_artists, 5);
    if !artists.is_empty() {
        println!("{}", Table::new(artists));
    }

    let genres = utils::genre_counts(&dataset.library);
    if !genres.is_empty() {
        let top: Vec<String> = genres
            .iter()
            .take(10)
            .map(|(genre, count)| format!("{genre} ({count})"))
            .collect();
        success!("Top genres: {}", top.join(", "));
    }
}
