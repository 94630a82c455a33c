use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::SpotifyApi;
use crate::{
    error::ApiError,
    session::SessionContext,
    types::{
        Artist, ArtistsResponse, AudioFeatures, AudioFeaturesResponse, Page, PageRequest,
        PagingObject, Profile, TimeRange, TrackEndpoint, TrackItem, TrackObject,
    },
};

/// Web API client bound to the access token of one session context.
///
/// Build a new client per top-level operation; a token refreshed later does
/// not leak into calls already made with this one.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(base_url: &str, session: &SessionContext) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: session.access_token.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url} {query:?}");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Maps non-success responses onto [`ApiError`], reading `Retry-After` on 429.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(0);
            Err(ApiError::RateLimited { retry_after })
        }
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn page_query(request: &PageRequest) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let TrackEndpoint::TopTracks(range) = request.endpoint {
        query.push(("time_range", range.as_str().to_string()));
    }
    // recently played is cursor based and ignores offsets
    if request.endpoint != TrackEndpoint::RecentlyPlayed {
        if let Some(offset) = request.offset {
            query.push(("offset", offset.to_string()));
        }
    }
    if let Some(limit) = request.limit {
        query.push(("limit", limit.to_string()));
    }
    query
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<TrackItem>, ApiError> {
        let query = page_query(&request);
        match request.endpoint {
            TrackEndpoint::SavedTracks => {
                let paging: PagingObject<TrackItem> = self.get("/me/tracks", &query).await?;
                Ok(paging.into())
            }
            TrackEndpoint::RecentlyPlayed => {
                let paging: PagingObject<TrackItem> =
                    self.get("/me/player/recently-played", &query).await?;
                Ok(paging.into())
            }
            TrackEndpoint::TopTracks(_) => {
                let paging: PagingObject<TrackObject> = self.get("/me/top/tracks", &query).await?;
                let page: Page<TrackObject> = paging.into();
                Ok(Page {
                    items: page.items.into_iter().map(TrackItem::from).collect(),
                    total: page.total,
                })
            }
        }
    }

    async fn audio_features(&self, ids: &[String]) -> Result<Vec<AudioFeatures>, ApiError> {
        let response: AudioFeaturesResponse = self
            .get("/audio-features", &[("ids", ids.join(","))])
            .await?;
        Ok(response.audio_features.into_iter().flatten().collect())
    }

    async fn artists(&self, ids: &[String]) -> Result<Vec<Artist>, ApiError> {
        let response: ArtistsResponse = self.get("/artists", &[("ids", ids.join(","))]).await?;
        Ok(response.artists.into_iter().flatten().collect())
    }

    async fn top_artists(&self, range: TimeRange, limit: u32) -> Result<Vec<Artist>, ApiError> {
        let paging: PagingObject<Artist> = self
            .get(
                "/me/top/artists",
                &[
                    ("time_range", range.as_str().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(paging.items)
    }

    async fn profile(&self) -> Result<Profile, ApiError> {
        self.get("/me", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use axum::http;

    use super::*;

    fn response(status: u16, retry_after: Option<&str>, body: &str) -> Response {
        let mut builder = http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("retry-after", value);
        }
        Response::from(builder.body(body.to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let err = check_status(response(429, Some("7"), "")).await.unwrap_err();
        assert_eq!(err, ApiError::RateLimited { retry_after: 7 });
    }

    #[tokio::test]
    async fn test_rate_limit_without_header_waits_zero() {
        let err = check_status(response(429, None, "")).await.unwrap_err();
        assert_eq!(err, ApiError::RateLimited { retry_after: 0 });

        let err = check_status(response(429, Some("soon"), ""))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::RateLimited { retry_after: 0 });
    }

    #[tokio::test]
    async fn test_unauthorized_and_server_errors() {
        let err = check_status(response(401, None, "")).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);

        let err = check_status(response(500, None, "upstream down"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "upstream down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let ok = check_status(response(200, None, "{}")).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
    }

    #[test]
    fn test_page_query_for_saved_tracks() {
        let query = page_query(&PageRequest::page(TrackEndpoint::SavedTracks, 100, 50));
        assert_eq!(
            query,
            vec![("offset", "100".to_string()), ("limit", "50".to_string())]
        );
    }

    #[test]
    fn test_probe_has_no_offset_or_limit() {
        let query = page_query(&PageRequest::probe(TrackEndpoint::SavedTracks));
        assert!(query.is_empty());
    }

    #[test]
    fn test_page_query_for_top_tracks_and_recent() {
        let top = page_query(&PageRequest::page(
            TrackEndpoint::TopTracks(TimeRange::LongTerm),
            0,
            50,
        ));
        assert_eq!(top[0], ("time_range", "long_term".to_string()));

        let recent = page_query(&PageRequest::page(TrackEndpoint::RecentlyPlayed, 0, 50));
        assert_eq!(recent, vec![("limit", "50".to_string())]);
    }
}
