//! # Aggregation Engine
//!
//! Turns logical requests ("all saved tracks", "audio features for these
//! tracks", "genres for these artists") into page- and chunk-sized API calls,
//! runs them concurrently, retries each one on its own when the API rate
//! limits, and merges the results back in their original order.
//!
//! ```text
//! batch::fetch_all ──┐
//!                    ├── retry::RetryExecutor ── SpotifyApi
//! lookup::lookup ────┘
//!          ↓
//! coalesce::coalesce ── Vec<VizTrack>
//! ```
//!
//! ## Concurrency
//!
//! Fan-outs are joined on the calling task with `futures::future::join_all`
//! and `try_join_all`. Calls interleave at their suspension points (network
//! I/O and backoff sleeps) but never run in parallel, so no locking is
//! involved. Completion order is undefined; merges are keyed by absolute
//! index or identifier.
//!
//! ## Failure policy
//!
//! - [`batch`] is best-effort: a page that fails after its retry budget is
//!   replaced by an empty page and reported on the returned collection.
//! - [`lookup`] is all-or-nothing: one failed chunk aborts the lookup with
//!   [`WayfinderError::LookupFailed`](crate::WayfinderError::LookupFailed).

pub mod batch;
pub mod coalesce;
pub mod lookup;
pub mod retry;

pub use batch::{IndexedCollection, fetch_all, fetch_page};
pub use coalesce::{GenreAttachment, GenreMode, coalesce, genres_by_index};
pub use lookup::{Keyed, artists_for_tracks, features_for_tracks, lookup};
pub use retry::{Clock, RetryExecutor, RetryPolicy, RetryState, TokioClock};

/// Page size limit of the saved tracks and top items endpoints.
pub const PAGE_LIMIT: u32 = 50;

/// Maximum number of ids accepted by the bulk artists endpoint.
pub const ARTISTS_CHUNK_LIMIT: usize = 50;

/// Maximum number of ids accepted by the bulk audio features endpoint.
pub const FEATURES_CHUNK_LIMIT: usize = 100;
