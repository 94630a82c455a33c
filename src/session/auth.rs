use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};

use super::{Entry, SessionContext, resolve};
use crate::{
    error::{Result, WayfinderError},
    info,
    management::{KeyValueStore, SessionManager},
    pkce::PkcePair,
    server::start_api_server,
    spotify::auth::{authorize_url, exchange_code_pkce, refresh_token},
    types::AuthCallback,
    warning,
};

/// How long `authenticate` waits for the browser to come back.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Carries out one resolved entry branch.
///
/// `Proceed`, `Refresh` and `ExchangeCode` end in a usable context.
/// `Denied` becomes [`WayfinderError::AuthDenied`] and `BeginPkce` becomes
/// [`WayfinderError::NotAuthenticated`], since the redirect needs a browser.
pub async fn settle<S: KeyValueStore>(
    session: &SessionManager<S>,
    entry: Entry,
) -> Result<SessionContext> {
    match entry {
        Entry::Proceed(context) => Ok(context),
        Entry::Refresh(refresh) => {
            log::debug!("access token expired, refreshing");
            let token = refresh_token(&refresh).await?;
            session.save_token(&token).await
        }
        Entry::ExchangeCode { code, verifier } => {
            session.record_authorization_code(&code).await?;
            let token = exchange_code_pkce(&code, &verifier).await?;
            session.save_token(&token).await
        }
        Entry::Denied(reason) => Err(WayfinderError::AuthDenied(reason)),
        Entry::BeginPkce => Err(WayfinderError::NotAuthenticated),
    }
}

/// Context for a non-interactive command, refreshing the token if needed.
pub async fn ensure_session<S: KeyValueStore>(
    session: &SessionManager<S>,
) -> Result<SessionContext> {
    let entry = resolve(session, &AuthCallback::default()).await?;
    settle(session, entry).await
}

/// Full PKCE login through the browser.
///
/// Stores a fresh verifier and challenge, serves the callback locally, opens
/// the authorization page and waits up to [`CALLBACK_TIMEOUT`] for the
/// redirect before exchanging the code.
pub async fn authenticate<S: KeyValueStore>(
    session: &SessionManager<S>,
) -> Result<SessionContext> {
    let pair = PkcePair::generate();
    session.begin_pkce(&pair).await?;
    let url = authorize_url(&pair.challenge)?;

    let callback_state: Arc<Mutex<Option<AuthCallback>>> = Arc::new(Mutex::new(None));
    let server = tokio::spawn(start_api_server(Arc::clone(&callback_state)));

    info!("Opening the authorization page in your browser...");
    if webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        );
    }

    let waited = wait_for_callback(&callback_state, &server).await;
    server.abort();

    let callback = match waited {
        Ok(Some(callback)) => callback,
        Ok(None) => {
            return Err(WayfinderError::AuthDenied(
                "no response from the authorization page".to_string(),
            ));
        }
        Err(err) => return Err(err),
    };

    let entry = resolve(session, &callback).await?;
    settle(session, entry).await
}

async fn wait_for_callback(
    state: &Arc<Mutex<Option<AuthCallback>>>,
    server: &tokio::task::JoinHandle<Result<()>>,
) -> Result<Option<AuthCallback>> {
    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        if let Some(callback) = state.lock().await.take() {
            return Ok(Some(callback));
        }
        if server.is_finished() {
            return Err(WayfinderError::Config(
                "callback server stopped before the redirect arrived, check SERVER_ADDRESS"
                    .to_string(),
            ));
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Ok(None)
}
