use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Treats an explicit JSON `null` like a missing field.
///
/// Local files in a user's library come back with `"id": null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Query parameters the authorization server redirected back with.
#[derive(Debug, Clone, Default)]
pub struct AuthCallback {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ShortTerm,
        TimeRange::MediumTerm,
        TimeRange::LongTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Track collections that are addressed page by page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackEndpoint {
    SavedTracks,
    RecentlyPlayed,
    TopTracks(TimeRange),
}

impl fmt::Display for TrackEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackEndpoint::SavedTracks => f.write_str("saved tracks"),
            TrackEndpoint::RecentlyPlayed => f.write_str("recently played"),
            TrackEndpoint::TopTracks(range) => write!(f, "top tracks ({})", range),
        }
    }
}

/// Address of one sub-range of a track collection. A request without offset
/// is the probe that discovers the collection size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: TrackEndpoint,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn probe(endpoint: TrackEndpoint) -> Self {
        Self {
            endpoint,
            offset: None,
            limit: None,
        }
    }

    pub fn page(endpoint: TrackEndpoint, offset: u32, limit: u32) -> Self {
        Self {
            endpoint,
            offset: Some(offset),
            limit: Some(limit),
        }
    }
}

/// Paging object as returned by the Web API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingObject<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u32>,
}

/// A normalized page: ordered items plus the declared collection size.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u32,
}

impl<T> From<PagingObject<T>> for Page<T> {
    fn from(paging: PagingObject<T>) -> Self {
        let total = paging.total.unwrap_or(paging.items.len() as u32);
        Page {
            items: paging.items,
            total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackObject {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

/// Item of a track page. Saved tracks carry `added_at`, recently played
/// tracks carry `played_at`, top tracks carry neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackItem {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub played_at: Option<String>,
    pub track: TrackObject,
}

impl From<TrackObject> for TrackItem {
    fn from(track: TrackObject) -> Self {
        TrackItem {
            added_at: None,
            played_at: None,
            track,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioFeatures {
    pub id: String,
    pub energy: f64,
    pub liveness: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub danceability: f64,
    pub loudness: f64,
    pub valence: f64,
    pub tempo: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistsResponse {
    pub artists: Vec<Option<Artist>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub followers: Followers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timestamp {
    AddedAt(String),
    PlayedAt(String),
}

impl Timestamp {
    pub fn value(&self) -> &str {
        match self {
            Timestamp::AddedAt(v) | Timestamp::PlayedAt(v) => v,
        }
    }
}

/// A track as it moves through the pipeline. Features and genres are
/// attached in place before the record is flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub popularity: u32,
    pub uri: String,
    pub artists: Vec<ArtistRef>,
    pub timestamp: Option<Timestamp>,
    pub audio_features: Option<AudioFeatures>,
    pub genres: Option<Vec<String>>,
}

impl From<TrackItem> for Track {
    fn from(item: TrackItem) -> Self {
        let timestamp = match (item.added_at, item.played_at) {
            (Some(added), _) => Some(Timestamp::AddedAt(added)),
            (None, Some(played)) => Some(Timestamp::PlayedAt(played)),
            (None, None) => None,
        };

        Track {
            id: item.track.id,
            name: item.track.name,
            popularity: item.track.popularity,
            uri: item.track.uri,
            artists: item.track.artists,
            timestamp,
            audio_features: None,
            genres: None,
        }
    }
}

/// Flat, visualization ready track record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VizTrack {
    pub id: String,
    pub name: String,
    pub popularity: u32,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub artists: Vec<String>,
    #[serde(rename = "_artists", default)]
    pub artist_refs: Vec<ArtistRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_features: Option<AudioFeatures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speechiness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acousticness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumentalness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danceability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loudness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
}

/// Everything one load produces, handed to the visualization sink.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub profile: Profile,
    pub library: Vec<VizTrack>,
    pub top_artists: BTreeMap<TimeRange, Vec<Artist>>,
    pub top_tracks: BTreeMap<TimeRange, Vec<VizTrack>>,
    pub recently_played: Vec<VizTrack>,
    pub fetched_at: i64,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub date: String,
    pub name: String,
    pub artists: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub range: String,
    pub name: String,
    pub genres: String,
}
