use std::{collections::HashMap, fmt, str::FromStr};

use crate::{
    error::WayfinderError,
    types::{Artist, AudioFeatures, Track, VizTrack},
};

/// How artist genres are matched onto tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenreMode {
    /// Genres of each track's own artists, looked up by artist id.
    #[default]
    ArtistId,
    /// Genre lists matched to tracks by list position. Breaks silently if the
    /// track list is reordered or filtered after the genre lists were derived.
    Positional,
}

impl FromStr for GenreMode {
    type Err = WayfinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artist-id" | "artist_id" | "id" => Ok(GenreMode::ArtistId),
            "positional" | "index" => Ok(GenreMode::Positional),
            other => Err(WayfinderError::Config(format!(
                "unknown genre mode '{other}', expected 'artist-id' or 'positional'"
            ))),
        }
    }
}

impl fmt::Display for GenreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreMode::ArtistId => f.write_str("artist-id"),
            GenreMode::Positional => f.write_str("positional"),
        }
    }
}

/// Genre source handed to [`coalesce`].
#[derive(Debug, Clone, Copy)]
pub enum GenreAttachment<'a> {
    ByArtistId(&'a HashMap<String, Artist>),
    Positional(&'a [Vec<String>]),
}

fn genres_of(track: &Track, artists: &HashMap<String, Artist>) -> Vec<String> {
    let mut genres = Vec::new();
    for reference in &track.artists {
        match artists.get(&reference.id) {
            Some(artist) => genres.extend(artist.genres.iter().cloned()),
            None => log::debug!(
                "no artist data for {} ({}) on track {}",
                reference.name,
                reference.id,
                track.id
            ),
        }
    }
    genres
}

/// One genre list per track, in track list order.
pub fn genres_by_index(tracks: &[Track], artists: &HashMap<String, Artist>) -> Vec<Vec<String>> {
    tracks.iter().map(|track| genres_of(track, artists)).collect()
}

/// Attaches features (by track id) and genres in place.
pub fn attach(
    tracks: &mut [Track],
    features_by_id: &HashMap<String, AudioFeatures>,
    genres: GenreAttachment<'_>,
) {
    for (index, track) in tracks.iter_mut().enumerate() {
        track.audio_features = features_by_id.get(&track.id).cloned();
        if track.audio_features.is_none() {
            let missing = WayfinderError::MissingFeatureData {
                track_id: track.id.clone(),
            };
            log::debug!("{missing}");
        }

        track.genres = match genres {
            GenreAttachment::ByArtistId(artists) => Some(genres_of(track, artists)),
            GenreAttachment::Positional(lists) => lists.get(index).cloned(),
        };
    }
}

/// Flattens one track into its visualization record.
pub fn flatten(track: Track) -> VizTrack {
    let date = track.timestamp.as_ref().map(|ts| ts.value().to_string());
    let features = track.audio_features.as_ref();
    let field = |f: fn(&AudioFeatures) -> f64| features.map(f);

    VizTrack {
        date,
        artists: track.artists.iter().map(|a| a.name.clone()).collect(),
        energy: field(|f| f.energy),
        liveness: field(|f| f.liveness),
        speechiness: field(|f| f.speechiness),
        acousticness: field(|f| f.acousticness),
        instrumentalness: field(|f| f.instrumentalness),
        danceability: field(|f| f.danceability),
        loudness: field(|f| f.loudness),
        valence: field(|f| f.valence),
        tempo: field(|f| f.tempo),
        id: track.id,
        name: track.name,
        popularity: track.popularity,
        uri: track.uri,
        artist_refs: track.artists,
        genres: track.genres,
        audio_features: track.audio_features,
    }
}

/// Merges features and genres onto `tracks` and flattens them.
///
/// Pure: no I/O, deterministic for the same inputs. Tracks without a features
/// entry keep their feature fields unset.
pub fn coalesce(
    mut tracks: Vec<Track>,
    features_by_id: &HashMap<String, AudioFeatures>,
    genres: GenreAttachment<'_>,
) -> Vec<VizTrack> {
    attach(&mut tracks, features_by_id, genres);
    tracks.into_iter().map(flatten).collect()
}

