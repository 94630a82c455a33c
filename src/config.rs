//! Configuration for the listening history aggregator.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Endpoints and scope have defaults; the
//! client id, redirect URI and callback server address must be provided.
//!
//! Engine tunables (retry budget, page size, genre mode) are collected into
//! [`EngineConfig`].

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    aggregate::{GenreMode, PAGE_LIMIT, RetryPolicy},
    error::{Result, WayfinderError},
};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str =
    "user-library-read user-read-recently-played user-top-read playlist-read-private";

/// Directory under the platform local data dir that holds config and cache.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("wayfinder");
    path
}

/// Loads `<data_local_dir>/wayfinder/.env` into the process environment.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error, variables may just as well come from the shell.
///
/// - Linux: `~/.local/share/wayfinder/.env`
/// - macOS: `~/Library/Application Support/wayfinder/.env`
/// - Windows: `%LOCALAPPDATA%/wayfinder/.env`
pub async fn load_env() -> Result<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    match dotenv::from_path(&path) {
        Ok(()) => log::debug!("loaded environment from {}", path.display()),
        Err(dotenv::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no .env at {}, using process environment", path.display())
        }
        Err(err) => {
            return Err(WayfinderError::Config(format!(
                "failed to read {}: {}",
                path.display(),
                err
            )));
        }
    }
    Ok(())
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| WayfinderError::Config(format!("{key} must be set")))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T, L>(lookup: &L, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| WayfinderError::Config(format!("{key} has an invalid value '{raw}'"))),
        None => Ok(default),
    }
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:8888`.
pub fn server_addr() -> Result<String> {
    required("SERVER_ADDRESS")
}

pub fn spotify_client_id() -> Result<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Must match the redirect URI registered for the client id.
pub fn spotify_redirect_uri() -> Result<String> {
    required("SPOTIFY_API_REDIRECT_URI")
}

pub fn spotify_scope() -> String {
    or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Tunables of the aggregation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub retry: RetryPolicy,
    pub page_size: u32,
    pub genre_mode: GenreMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            page_size: PAGE_LIMIT,
            genre_mode: GenreMode::default(),
        }
    }
}

impl EngineConfig {
    /// Reads `WAYFINDER_MAX_RETRIES`, `WAYFINDER_RETRY_LEEWAY_SECS`,
    /// `WAYFINDER_PAGE_SIZE` and `WAYFINDER_GENRE_MODE`, falling back to the
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with variables taken from `lookup`.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_retries = parsed(&lookup, "WAYFINDER_MAX_RETRIES", defaults.retry.max_retries)?;
        let leeway = parsed(
            &lookup,
            "WAYFINDER_RETRY_LEEWAY_SECS",
            defaults.retry.leeway.as_secs(),
        )?;
        let page_size: u32 = parsed(&lookup, "WAYFINDER_PAGE_SIZE", defaults.page_size)?;
        let genre_mode = parsed(&lookup, "WAYFINDER_GENRE_MODE", defaults.genre_mode)?;

        Ok(Self {
            retry: RetryPolicy {
                max_retries,
                leeway: Duration::from_secs(leeway),
            },
            page_size: page_size.clamp(1, PAGE_LIMIT),
            genre_mode,
        })
    }
}
