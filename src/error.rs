use thiserror::Error;

/// Failure of a single call against the Spotify Web API.
///
/// This is what the retry executor sees. Only [`ApiError::RateLimited`] carries
/// a backoff hint; every other variant is retried immediately.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// HTTP 429 with the server supplied `Retry-After` value in seconds.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// The access token was rejected (HTTP 401).
    #[error("Access token rejected")]
    Unauthorized,

    /// Any other non-success status code.
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection level failure, no response was received.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Seconds to wait before the next attempt, if the server asked for it.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ApiError::Http(err.to_string()),
        }
    }
}

/// Error taxonomy of the aggregation engine and its surrounding session glue.
#[derive(Error, Debug)]
pub enum WayfinderError {
    /// A call failed and was not retried (e.g. the token endpoint).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The retry budget was spent. `source` is the error of the last attempt.
    #[error("Gave up after {attempts} attempts: {source}")]
    RetryExhausted { attempts: u32, source: ApiError },

    /// One chunk of a bulk lookup failed, which aborts the whole lookup.
    #[error("Lookup of chunk {chunk} ({size} ids) failed: {source}")]
    LookupFailed {
        chunk: usize,
        size: usize,
        #[source]
        source: Box<WayfinderError>,
    },

    /// One page of a batch failed. Recorded by the batch aggregator, never
    /// propagated out of it.
    #[error("Page at offset {offset} failed: {source}")]
    PageFailed {
        offset: u32,
        #[source]
        source: Box<WayfinderError>,
    },

    /// A track has no audio features entry. Tolerated by the coalescer.
    #[error("No audio features for track {track_id}")]
    MissingFeatureData { track_id: String },

    /// The user declined authorization.
    #[error("Authorization denied: {0}")]
    AuthDenied(String),

    /// No usable session credentials; the user has to authenticate.
    #[error("Not authenticated, run `wayfinder auth` first")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WayfinderError>;
