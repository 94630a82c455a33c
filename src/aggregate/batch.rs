use std::collections::BTreeMap;

use futures::future::join_all;

use super::{
    PAGE_LIMIT,
    retry::{Clock, RetryExecutor},
};
use crate::{
    error::{Result, WayfinderError},
    spotify::SpotifyApi,
    types::{PageRequest, TrackEndpoint, TrackItem},
};

/// Items of a remote collection keyed by their absolute index.
///
/// Indices that belong to a failed page are simply absent; the remaining
/// items keep their original position.
#[derive(Debug)]
pub struct IndexedCollection<T> {
    total: u32,
    items: BTreeMap<usize, T>,
    failures: Vec<WayfinderError>,
}

impl<T> IndexedCollection<T> {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            items: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Writes the items of one page starting at `offset`.
    pub fn insert_page(&mut self, offset: u32, items: Vec<T>) {
        for (index, item) in items.into_iter().enumerate() {
            self.items.insert(offset as usize + index, item);
        }
    }

    pub fn record_failure(&mut self, failure: WayfinderError) {
        self.failures.push(failure);
    }

    /// Collection size the remote declared in the probe.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Number of populated indices.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(&index)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.items.len() == self.total as usize
    }

    /// `PageFailed` errors of pages that were replaced by empty results.
    pub fn failures(&self) -> &[WayfinderError] {
        &self.failures
    }

    pub fn missing_indices(&self) -> Vec<usize> {
        (0..self.total as usize)
            .filter(|index| !self.items.contains_key(index))
            .collect()
    }

    /// Populated items in original remote order.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_values().collect()
    }

    /// Items in remote order together with the recorded page failures.
    pub fn into_parts(self) -> (Vec<T>, Vec<WayfinderError>) {
        (self.items.into_values().collect(), self.failures)
    }
}

fn page_count(total: u32, page_size: u32) -> u32 {
    total.div_ceil(page_size)
}

/// Fetches a whole paginated track collection.
///
/// Issues one probe without offset to learn `total`, then requests every page
/// concurrently, each wrapped in the retry executor. A page that still fails
/// is logged, recorded as `PageFailed` and left empty; the other pages are
/// kept. A failing probe is returned as an error.
pub async fn fetch_all<A, C>(
    api: &A,
    retry: &RetryExecutor<C>,
    endpoint: TrackEndpoint,
    page_size: u32,
) -> Result<IndexedCollection<TrackItem>>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let page_size = page_size.clamp(1, PAGE_LIMIT);
    let probe = PageRequest::probe(endpoint);
    let total = retry
        .execute(&format!("{endpoint} probe"), || api.fetch_page(probe))
        .await?
        .total;

    let mut collection = IndexedCollection::new(total);
    if total == 0 {
        return Ok(collection);
    }

    let num_pages = page_count(total, page_size);
    log::debug!("{endpoint}: {total} items in {num_pages} pages of {page_size}");

    let pages = (0..num_pages).map(|page| {
        let request = PageRequest::page(endpoint, page * page_size, page_size);
        async move {
            let label = format!("{endpoint} page at offset {}", page * page_size);
            let result = retry.execute(&label, || api.fetch_page(request)).await;
            (page * page_size, result)
        }
    });

    for (offset, result) in join_all(pages).await {
        match result {
            Ok(page) => collection.insert_page(offset, page.items),
            Err(err) => {
                log::warn!("{endpoint}: dropping page at offset {offset}: {err}");
                collection.record_failure(WayfinderError::PageFailed {
                    offset,
                    source: Box::new(err),
                });
            }
        }
    }

    Ok(collection)
}

/// Fetches a single retry-wrapped page, for endpoints that are read in one go
/// (recently played, top tracks).
pub async fn fetch_page<A, C>(
    api: &A,
    retry: &RetryExecutor<C>,
    request: PageRequest,
) -> Result<Vec<TrackItem>>
where
    A: SpotifyApi + ?Sized,
    C: Clock,
{
    let label = request.endpoint.to_string();
    let page = retry.execute(&label, || api.fetch_page(request)).await?;
    Ok(page.items)
}
