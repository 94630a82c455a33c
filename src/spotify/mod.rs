//! # Spotify Integration Module
//!
//! The integration layer between the aggregation engine and the Spotify Web
//! API. Everything that touches the network lives here.
//!
//! ## Architecture
//!
//! ```text
//! Session Orchestration (session::orchestrator)
//!          ↓
//! Aggregation Engine (aggregate::{batch, lookup})
//!          ↓
//! SpotifyApi trait  ←── SpotifyClient (reqwest, bearer token)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - Token endpoint (authorization code and refresh token grants)
//!   and the authorization URL for the PKCE redirect.
//! - [`client`] - [`SpotifyClient`], the reqwest implementation of
//!   [`SpotifyApi`].
//!
//! ## Error Mapping
//!
//! Every call returns [`ApiError`]. A `429 Too Many Requests` becomes
//! [`ApiError::RateLimited`] carrying the `Retry-After` seconds, which is the
//! only signal the retry executor backs off on. No call in this module
//! retries by itself.
//!
//! ## Endpoints
//!
//! - `GET /me/tracks` - saved tracks, offset/limit paginated
//! - `GET /me/player/recently-played` - limit only
//! - `GET /me/top/tracks`, `GET /me/top/artists` - per time range
//! - `GET /audio-features?ids=` - up to 100 ids
//! - `GET /artists?ids=` - up to 50 ids
//! - `GET /me` - current user profile
//! - `POST /api/token` - token exchange and refresh

pub mod auth;
pub mod client;

use async_trait::async_trait;

pub use client::SpotifyClient;

use crate::{
    error::ApiError,
    types::{Artist, AudioFeatures, Page, PageRequest, Profile, TimeRange, TrackItem},
};

/// The read-only slice of the Web API the aggregator consumes.
///
/// Implementations issue exactly one request per call and never retry;
/// retrying is composed on top via
/// [`RetryExecutor`](crate::aggregate::RetryExecutor).
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Fetches one page of a track collection and normalizes its items.
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<TrackItem>, ApiError>;

    /// Audio features for up to 100 track ids. Unknown ids are skipped.
    async fn audio_features(&self, ids: &[String]) -> Result<Vec<AudioFeatures>, ApiError>;

    /// Full artist objects for up to 50 artist ids. Unknown ids are skipped.
    async fn artists(&self, ids: &[String]) -> Result<Vec<Artist>, ApiError>;

    async fn top_artists(&self, range: TimeRange, limit: u32) -> Result<Vec<Artist>, ApiError>;

    async fn profile(&self) -> Result<Profile, ApiError>;
}
