mod common;

use std::collections::HashMap;

use common::{artist, artist_ref, features, played_item, saved_item, track_object};
use wayfinder::{
    aggregate::{GenreAttachment, GenreMode, coalesce, genres_by_index},
    types::{Track, TrackItem},
};

fn artist_table() -> HashMap<String, wayfinder::types::Artist> {
    [
        ("artist-0", vec!["indie"]),
        ("artist-1", vec!["shoegaze", "dream pop"]),
        ("artist-2", vec!["techno"]),
    ]
    .into_iter()
    .map(|(id, genres)| (id.to_string(), artist(id, &genres)))
    .collect()
}

#[test]
fn test_date_comes_from_added_at_or_played_at() {
    let saved = Track::from(saved_item(0));
    let played = Track::from(played_item("p", "2024-05-05T12:00:00Z"));
    let top = Track::from(TrackItem::from(track_object("t", &["artist-0"])));

    let out = coalesce(
        vec![saved, played, top],
        &HashMap::new(),
        GenreAttachment::ByArtistId(&HashMap::new()),
    );

    assert_eq!(out[0].date.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert_eq!(out[1].date.as_deref(), Some("2024-05-05T12:00:00Z"));
    assert_eq!(out[2].date, None);
}

#[test]
fn test_added_at_wins_when_both_present() {
    let mut item = played_item("x", "2024-02-02T00:00:00Z");
    item.added_at = Some("2023-01-01T00:00:00Z".to_string());

    let out = coalesce(
        vec![Track::from(item)],
        &HashMap::new(),
        GenreAttachment::ByArtistId(&HashMap::new()),
    );

    assert_eq!(out[0].date.as_deref(), Some("2023-01-01T00:00:00Z"));
}

#[test]
fn test_features_are_lifted_and_missing_ones_stay_unset() {
    let tracks = vec![
        Track::from(TrackItem::from(track_object("a", &["artist-0"]))),
        Track::from(TrackItem::from(track_object("b", &["artist-0"]))),
    ];
    let table = HashMap::from([("b".to_string(), features("b"))]);

    let out = coalesce(tracks, &table, GenreAttachment::ByArtistId(&artist_table()));

    assert!(out[0].audio_features.is_none());
    assert_eq!(out[0].energy, None);
    assert_eq!(out[0].tempo, None);

    assert_eq!(out[1].audio_features.as_ref().unwrap().id, "b");
    assert_eq!(out[1].energy, Some(0.5));
    assert_eq!(out[1].danceability, Some(0.7));
    assert_eq!(out[1].loudness, Some(-6.0));
    assert_eq!(out[1].tempo, Some(120.0));
}

#[test]
fn test_genres_follow_artist_ids_in_artist_order() {
    let mut object = track_object("multi", &["artist-1", "artist-0"]);
    object.artists.push(artist_ref("unknown"));
    let tracks = vec![Track::from(TrackItem::from(object))];

    let out = coalesce(
        tracks,
        &HashMap::new(),
        GenreAttachment::ByArtistId(&artist_table()),
    );

    assert_eq!(
        out[0].genres.as_deref(),
        Some(&["shoegaze".to_string(), "dream pop".to_string(), "indie".to_string()][..])
    );
    assert_eq!(
        out[0].artists,
        vec!["Name of artist-1", "Name of artist-0", "Name of unknown"]
    );
    assert_eq!(out[0].artist_refs.len(), 3);
    assert_eq!(out[0].artist_refs[0].id, "artist-1");
}

#[test]
fn test_positional_matches_id_keyed_on_unchanged_order() {
    let tracks: Vec<Track> = (0..3)
        .map(|i| {
            Track::from(TrackItem::from(track_object(
                &format!("t{i}"),
                &[&format!("artist-{i}")],
            )))
        })
        .collect();
    let artists = artist_table();
    let lists = genres_by_index(&tracks, &artists);

    let by_id = coalesce(
        tracks.clone(),
        &HashMap::new(),
        GenreAttachment::ByArtistId(&artists),
    );
    let positional = coalesce(
        tracks,
        &HashMap::new(),
        GenreAttachment::Positional(&lists),
    );

    assert_eq!(by_id, positional);
}

#[test]
fn test_positional_goes_wrong_after_reordering() {
    let tracks: Vec<Track> = (0..3)
        .map(|i| {
            Track::from(TrackItem::from(track_object(
                &format!("t{i}"),
                &[&format!("artist-{i}")],
            )))
        })
        .collect();
    let lists = genres_by_index(&tracks, &artist_table());

    let mut reordered = tracks;
    reordered.reverse();
    let out = coalesce(
        reordered,
        &HashMap::new(),
        GenreAttachment::Positional(&lists),
    );

    // t2 now sits at index 0 and receives the genres derived for t0
    assert_eq!(out[0].id, "t2");
    assert_eq!(out[0].genres.as_deref(), Some(&["indie".to_string()][..]));
}

#[test]
fn test_positional_list_shorter_than_tracks_leaves_genres_unset() {
    let tracks = vec![
        Track::from(saved_item(0)),
        Track::from(saved_item(1)),
    ];
    let lists = vec![vec!["indie".to_string()]];

    let out = coalesce(tracks, &HashMap::new(), GenreAttachment::Positional(&lists));

    assert!(out[0].genres.is_some());
    assert!(out[1].genres.is_none());
}

#[test]
fn test_genre_mode_parsing() {
    assert_eq!("artist-id".parse::<GenreMode>().unwrap(), GenreMode::ArtistId);
    assert_eq!("Positional".parse::<GenreMode>().unwrap(), GenreMode::Positional);
    assert!("random".parse::<GenreMode>().is_err());
    assert_eq!(GenreMode::default().to_string(), "artist-id");
}

#[test]
fn test_viz_track_serializes_artist_refs_as_underscore_field() {
    let out = coalesce(
        vec![Track::from(saved_item(3))],
        &HashMap::from([("track-3".to_string(), features("track-3"))]),
        GenreAttachment::ByArtistId(&artist_table()),
    );

    let json = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(json["date"], "2024-01-01T00:00:03Z");
    assert_eq!(json["_artists"][0]["id"], "artist-3");
    assert_eq!(json["artists"][0], "Name of artist-3");
    assert_eq!(json["valence"], 0.4);
    assert!(json.get("artist_refs").is_none());
}
