use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use futures::{future::try_join_all, try_join};

use super::SessionContext;
use crate::{
    aggregate::{
        Clock, GenreAttachment, GenreMode, PAGE_LIMIT, RetryExecutor, artists_for_tracks, coalesce,
        features_for_tracks, fetch_all, fetch_page, genres_by_index,
    },
    config::{self, EngineConfig},
    error::{Result, WayfinderError},
    spotify::{SpotifyApi, SpotifyClient},
    types::{
        Artist, AudioFeatures, Dataset, PageRequest, TimeRange, Track, TrackEndpoint, TrackItem,
        VizTrack,
    },
};

/// A finished load plus the pages that had to be left empty.
#[derive(Debug)]
pub struct LoadReport {
    pub dataset: Dataset,
    pub failures: Vec<WayfinderError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

async fn fetch_library<A, C>(
    api: &A,
    retry: &RetryExecutor<C>,
    page_size: u32,
) -> Result<(Vec<Track>, Vec<WayfinderError>)>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let collection = fetch_all(api, retry, TrackEndpoint::SavedTracks, page_size).await?;
    if !collection.is_complete() {
        log::warn!(
            "library: {} of {} tracks missing",
            collection.missing_indices().len(),
            collection.total()
        );
    }
    let (items, failures) = collection.into_parts();
    Ok((tracks_of(items), failures))
}

fn tracks_of(items: Vec<TrackItem>) -> Vec<Track> {
    items.into_iter().map(Track::from).collect()
}

async fn fetch_top_tracks<A, C>(
    api: &A,
    retry: &RetryExecutor<C>,
) -> Result<Vec<(TimeRange, Vec<Track>)>>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let calls = TimeRange::ALL.into_iter().map(|range| async move {
        let request = PageRequest::page(TrackEndpoint::TopTracks(range), 0, PAGE_LIMIT);
        let items = fetch_page(api, retry, request).await?;
        Ok::<_, WayfinderError>((range, tracks_of(items)))
    });
    try_join_all(calls).await
}

async fn fetch_top_artists<A, C>(
    api: &A,
    retry: &RetryExecutor<C>,
) -> Result<BTreeMap<TimeRange, Vec<Artist>>>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let calls = TimeRange::ALL.into_iter().map(|range| async move {
        let label = format!("top artists ({range})");
        let artists = retry
            .execute(&label, || api.top_artists(range, PAGE_LIMIT))
            .await?;
        Ok::<_, WayfinderError>((range, artists))
    });
    Ok(try_join_all(calls).await?.into_iter().collect())
}

async fn fetch_recently_played<A, C>(api: &A, retry: &RetryExecutor<C>) -> Result<Vec<Track>>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let request = PageRequest::page(TrackEndpoint::RecentlyPlayed, 0, PAGE_LIMIT);
    Ok(tracks_of(fetch_page(api, retry, request).await?))
}

fn enrich(
    tracks: Vec<Track>,
    features: &HashMap<String, AudioFeatures>,
    artists: &HashMap<String, Artist>,
    mode: GenreMode,
) -> Vec<VizTrack> {
    match mode {
        GenreMode::ArtistId => coalesce(tracks, features, GenreAttachment::ByArtistId(artists)),
        GenreMode::Positional => {
            let lists = genres_by_index(&tracks, artists);
            coalesce(tracks, features, GenreAttachment::Positional(&lists))
        }
    }
}

/// Runs the five top-level queries concurrently and assembles the dataset.
///
/// Library, top artists, top tracks, recently played and profile are fetched
/// side by side. Features and artists for every collected track are then
/// looked up together and coalesced per collection. Exhausted retries and
/// failed lookups abort the load; failed library pages only show up in
/// [`LoadReport::failures`].
pub async fn load_dataset<A, C>(
    api: &A,
    retry: &RetryExecutor<C>,
    config: &EngineConfig,
) -> Result<LoadReport>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let ((library, failures), top_artists, top_tracks, recent, profile) = try_join!(
        fetch_library(api, retry, config.page_size),
        fetch_top_artists(api, retry),
        fetch_top_tracks(api, retry),
        fetch_recently_played(api, retry),
        retry.execute("profile", || api.profile()),
    )?;

    let everything: Vec<Track> = library
        .iter()
        .chain(top_tracks.iter().flat_map(|(_, tracks)| tracks.iter()))
        .chain(recent.iter())
        .cloned()
        .collect();

    let (features, artists) = try_join!(
        features_for_tracks(api, retry, &everything),
        artists_for_tracks(api, retry, &everything),
    )?;
    log::debug!(
        "enriching {} tracks with {} feature sets and {} artists ({} genres)",
        everything.len(),
        features.len(),
        artists.len(),
        config.genre_mode
    );

    let mode = config.genre_mode;
    let dataset = Dataset {
        profile,
        library: enrich(library, &features, &artists, mode),
        top_artists,
        top_tracks: top_tracks
            .into_iter()
            .map(|(range, tracks)| (range, enrich(tracks, &features, &artists, mode)))
            .collect(),
        recently_played: enrich(recent, &features, &artists, mode),
        fetched_at: Utc::now().timestamp(),
    };

    Ok(LoadReport { dataset, failures })
}

/// Loads the dataset with the live client for `session`.
pub async fn run(session: &SessionContext, config: &EngineConfig) -> Result<LoadReport> {
    let api = SpotifyClient::new(&config::spotify_apiurl(), session);
    let retry = RetryExecutor::new(config.retry);
    load_dataset(&api, &retry, config).await
}
