#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use wayfinder::{
    ApiError,
    aggregate::{Clock, RetryExecutor, RetryPolicy},
    spotify::SpotifyApi,
    types::{
        Artist, ArtistRef, AudioFeatures, Followers, Page, PageRequest, Profile, TimeRange,
        TrackEndpoint, TrackItem, TrackObject,
    },
};

/// Clock that records requested delays and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingClock {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingClock {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub fn test_retry() -> RetryExecutor<RecordingClock> {
    RetryExecutor::with_clock(RetryPolicy::default(), RecordingClock::default())
}

pub fn artist_ref(id: &str) -> ArtistRef {
    ArtistRef {
        id: id.to_string(),
        name: format!("Name of {id}"),
    }
}

pub fn track_object(id: &str, artists: &[&str]) -> TrackObject {
    TrackObject {
        id: id.to_string(),
        name: format!("Song {id}"),
        popularity: 50,
        uri: format!("spotify:track:{id}"),
        artists: artists.iter().map(|a| artist_ref(a)).collect(),
    }
}

/// Saved track `track-{i}` by artist `artist-{i % 7}`.
pub fn saved_item(i: usize) -> TrackItem {
    TrackItem {
        added_at: Some(format!("2024-01-01T00:{:02}:{:02}Z", i / 60, i % 60)),
        played_at: None,
        track: track_object(&format!("track-{i}"), &[&format!("artist-{}", i % 7)]),
    }
}

pub fn played_item(id: &str, played_at: &str) -> TrackItem {
    TrackItem {
        added_at: None,
        played_at: Some(played_at.to_string()),
        track: track_object(id, &["artist-0"]),
    }
}

pub fn features(id: &str) -> AudioFeatures {
    AudioFeatures {
        id: id.to_string(),
        energy: 0.5,
        liveness: 0.1,
        speechiness: 0.05,
        acousticness: 0.3,
        instrumentalness: 0.0,
        danceability: 0.7,
        loudness: -6.0,
        valence: 0.4,
        tempo: 120.0,
    }
}

pub fn artist(id: &str, genres: &[&str]) -> Artist {
    Artist {
        id: id.to_string(),
        name: format!("Name of {id}"),
        popularity: 60,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        uri: format!("spotify:artist:{id}"),
    }
}

/// In-memory Web API with call recording and scripted failures.
#[derive(Default)]
pub struct FakeApi {
    pub library: Vec<TrackItem>,
    pub recent: Vec<TrackItem>,
    pub top_tracks: Vec<TrackObject>,
    pub top_artists: Vec<Artist>,
    pub artists: HashMap<String, Artist>,
    pub features: HashMap<String, AudioFeatures>,
    /// Library pages at these offsets always fail with a 500.
    pub failing_offsets: HashSet<u32>,
    /// Any feature request containing this id always fails with a 500.
    pub failing_feature_id: Option<String>,

    pub page_calls: Mutex<Vec<PageRequest>>,
    pub feature_calls: Mutex<Vec<usize>>,
    pub artist_calls: Mutex<Vec<usize>>,
}

impl FakeApi {
    /// `n` saved tracks with features and artists for all of them.
    pub fn with_library(n: usize) -> Self {
        let library: Vec<TrackItem> = (0..n).map(saved_item).collect();
        let features = library
            .iter()
            .map(|item| (item.track.id.clone(), features(&item.track.id)))
            .collect();
        let artists = (0..7)
            .map(|i| {
                let id = format!("artist-{i}");
                let genre = format!("genre-{i}");
                (id.clone(), artist(&id, &[&genre]))
            })
            .collect();
        Self {
            library,
            features,
            artists,
            ..Default::default()
        }
    }

    pub fn library_page_calls(&self) -> Vec<PageRequest> {
        self.page_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.endpoint == TrackEndpoint::SavedTracks)
            .copied()
            .collect()
    }

    pub fn feature_calls(&self) -> Vec<usize> {
        self.feature_calls.lock().unwrap().clone()
    }

    pub fn artist_calls(&self) -> Vec<usize> {
        self.artist_calls.lock().unwrap().clone()
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }
    }
}

#[async_trait]
impl SpotifyApi for FakeApi {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<TrackItem>, ApiError> {
        self.page_calls.lock().unwrap().push(request);

        match request.endpoint {
            TrackEndpoint::SavedTracks => {
                let total = self.library.len() as u32;
                let offset = request.offset.unwrap_or(0);
                if request.offset.is_some() && self.failing_offsets.contains(&offset) {
                    return Err(Self::server_error());
                }
                let limit = request.limit.unwrap_or(20) as usize;
                let items = self
                    .library
                    .iter()
                    .skip(offset as usize)
                    .take(limit)
                    .cloned()
                    .collect();
                Ok(Page { items, total })
            }
            TrackEndpoint::RecentlyPlayed => Ok(Page {
                items: self.recent.clone(),
                total: self.recent.len() as u32,
            }),
            TrackEndpoint::TopTracks(_) => Ok(Page {
                items: self.top_tracks.iter().cloned().map(TrackItem::from).collect(),
                total: self.top_tracks.len() as u32,
            }),
        }
    }

    async fn audio_features(&self, ids: &[String]) -> Result<Vec<AudioFeatures>, ApiError> {
        self.feature_calls.lock().unwrap().push(ids.len());
        if let Some(failing) = &self.failing_feature_id {
            if ids.contains(failing) {
                return Err(Self::server_error());
            }
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.features.get(id).cloned())
            .collect())
    }

    async fn artists(&self, ids: &[String]) -> Result<Vec<Artist>, ApiError> {
        self.artist_calls.lock().unwrap().push(ids.len());
        Ok(ids
            .iter()
            .filter_map(|id| self.artists.get(id).cloned())
            .collect())
    }

    async fn top_artists(&self, _range: TimeRange, limit: u32) -> Result<Vec<Artist>, ApiError> {
        Ok(self
            .top_artists
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn profile(&self) -> Result<Profile, ApiError> {
        Ok(Profile {
            id: "listener".to_string(),
            display_name: Some("Listener".to_string()),
            country: Some("DE".to_string()),
            product: Some("premium".to_string()),
            uri: "spotify:user:listener".to_string(),
            followers: Followers { total: 3 },
        })
    }
}
