use std::{
    collections::{HashMap, HashSet},
    future::Future,
};

use futures::future::try_join_all;

use super::{
    ARTISTS_CHUNK_LIMIT, FEATURES_CHUNK_LIMIT,
    retry::{Clock, RetryExecutor},
};
use crate::{
    error::{ApiError, Result, WayfinderError},
    spotify::SpotifyApi,
    types::{Artist, AudioFeatures, Track},
};

/// Entities returned by a bulk lookup endpoint, keyed by their id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Artist {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AudioFeatures {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Drops duplicates and empty ids, keeping first-seen order.
pub fn dedupe<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

pub fn chunk_ids(ids: &[String], chunk_size: usize) -> Vec<Vec<String>> {
    ids.chunks(chunk_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Resolves every distinct id through `lookup_fn`, `chunk_size` ids per call.
///
/// Chunks are requested concurrently, each one retry-wrapped. The first chunk
/// that fails after its retry budget aborts the whole lookup with
/// [`WayfinderError::LookupFailed`]. Callers map the returned table back onto
/// their own, possibly duplicate-laden, reference lists.
pub async fn lookup<'a, T, I, F, Fut, C>(
    ids: I,
    chunk_size: usize,
    retry: &RetryExecutor<C>,
    lookup_fn: F,
) -> Result<HashMap<String, T>>
where
    T: Keyed,
    I: IntoIterator<Item = &'a str>,
    F: Fn(Vec<String>) -> Fut,
    Fut: Future<Output = std::result::Result<Vec<T>, ApiError>>,
    C: Clock,
{
    let unique = dedupe(ids);
    let chunks = chunk_ids(&unique, chunk_size);
    log::debug!(
        "looking up {} distinct ids in {} chunks",
        unique.len(),
        chunks.len()
    );

    let lookup_fn = &lookup_fn;
    let calls = chunks.into_iter().enumerate().map(|(index, chunk)| async move {
        let size = chunk.len();
        let label = format!("lookup chunk {index} ({size} ids)");
        retry
            .execute(&label, || lookup_fn(chunk.clone()))
            .await
            .map_err(|err| WayfinderError::LookupFailed {
                chunk: index,
                size,
                source: Box::new(err),
            })
    });

    let mut table = HashMap::with_capacity(unique.len());
    for entities in try_join_all(calls).await? {
        for entity in entities {
            table.insert(entity.key().to_string(), entity);
        }
    }

    Ok(table)
}

/// Audio features for every distinct track id, keyed by track id.
pub async fn features_for_tracks<A, C>(
    api: &A,
    retry: &RetryExecutor<C>,
    tracks: &[Track],
) -> Result<HashMap<String, AudioFeatures>>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let features = lookup(
        tracks.iter().map(|track| track.id.as_str()),
        FEATURES_CHUNK_LIMIT,
        retry,
        |ids| async move { api.audio_features(&ids).await },
    )
    .await?;

    log::debug!(
        "requested features for {} tracks and got {}",
        tracks.len(),
        features.len()
    );
    Ok(features)
}

/// Artist objects for every distinct artist referenced by `tracks`.
pub async fn artists_for_tracks<A, C>(
    api: &A,
    retry: &RetryExecutor<C>,
    tracks: &[Track],
) -> Result<HashMap<String, Artist>>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let references = tracks
        .iter()
        .flat_map(|track| track.artists.iter())
        .map(|artist| artist.id.as_str());

    lookup(references, ARTISTS_CHUNK_LIMIT, retry, |ids| async move {
        api.artists(&ids).await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_seen_order() {
        let ids = ["b", "a", "b", "", "c", "a"];
        assert_eq!(dedupe(ids), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_chunk_ids_zero_size_is_one() {
        let ids = vec!["a".to_string(), "b".to_string()];
        assert_eq!(chunk_ids(&ids, 0).len(), 2);
    }
}
