use std::{collections::BTreeMap, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::types::{Artist, ArtistTableRow, TimeRange, TrackTableRow, VizTrack};

/// Blue braille spinner with a steady tick.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

fn first_genres(genres: &[String], n: usize) -> String {
    genres.iter().take(n).cloned().collect::<Vec<_>>().join(",")
}

/// Date part of an ISO timestamp, e.g. `2024-03-01T10:00:00Z` -> `2024-03-01`.
pub fn short_date(timestamp: &str) -> String {
    timestamp.split('T').next().unwrap_or(timestamp).to_string()
}

pub fn track_row(track: &VizTrack) -> TrackTableRow {
    TrackTableRow {
        date: track.date.as_deref().map(short_date).unwrap_or_default(),
        name: track.name.clone(),
        artists: track.artists.join(", "),
        genres: track
            .genres
            .as_deref()
            .map(|genres| first_genres(genres, 3))
            .unwrap_or_default(),
    }
}

pub fn track_rows(tracks: &[VizTrack]) -> Vec<TrackTableRow> {
    tracks.iter().map(track_row).collect()
}

/// The first `per_range` artists of every time range.
pub fn artist_rows(
    top_artists: &BTreeMap<TimeRange, Vec<Artist>>,
    per_range: usize,
) -> Vec<ArtistTableRow> {
    top_artists
        .iter()
        .flat_map(|(range, artists)| {
            artists
                .iter()
                .take(per_range)
                .map(move |artist| ArtistTableRow {
                    range: range.to_string(),
                    name: artist.name.clone(),
                    genres: first_genres(&artist.genres, 3),
                })
        })
        .collect()
}

/// Case-insensitive match on track name, artist names and genres.
pub fn matches_search(track: &VizTrack, term: &str) -> bool {
    let term = term.to_lowercase();
    track.name.to_lowercase().contains(&term)
        || track
            .artists
            .iter()
            .any(|artist| artist.to_lowercase().contains(&term))
        || track
            .genres
            .iter()
            .flatten()
            .any(|genre| genre.to_lowercase().contains(&term))
}

/// Newest first; undated tracks go last.
pub fn sort_by_date_desc(tracks: &mut [VizTrack]) {
    tracks.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Genres by number of occurrences across `tracks`, most frequent first.
pub fn genre_counts(tracks: &[VizTrack]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for genre in tracks.iter().flat_map(|t| t.genres.iter().flatten()) {
        *counts.entry(genre.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(genre, count)| (genre.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}
