use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{
    api, config,
    error::{Result, WayfinderError},
    types::AuthCallback,
};

/// Serves `/callback` and `/health` on `SERVER_ADDRESS` until aborted.
///
/// The callback handler writes the redirect parameters into `state`; the
/// health handler reads it to report login progress.
pub async fn start_api_server(state: Arc<Mutex<Option<AuthCallback>>>) -> Result<()> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state));

    let raw = config::server_addr()?;
    let addr = SocketAddr::from_str(&raw)
        .map_err(|e| WayfinderError::Config(format!("invalid SERVER_ADDRESS '{raw}': {e}")))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::debug!("callback server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
