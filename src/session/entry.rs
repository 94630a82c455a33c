use chrono::Utc;

use crate::{
    error::Result,
    management::{KeyValueStore, SessionManager},
    types::AuthCallback,
};

use super::SessionContext;

/// What has to happen before the listening history can be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// The authorization server redirected back with `error`.
    Denied(String),
    /// Redirected back with a code and a verifier is on file.
    ExchangeCode { code: String, verifier: String },
    /// A live access token is stored.
    Proceed(SessionContext),
    /// The access token expired but a refresh token is stored.
    Refresh(String),
    /// Nothing usable, start the authorization redirect.
    BeginPkce,
}

/// Picks the entry branch from stored credentials and callback parameters.
///
/// Callback parameters win over stored tokens: an `error` always denies, a
/// `code` is exchanged as long as its verifier is still stored. Without a
/// callback code, a code left over from an earlier failed exchange is used.
/// A code without verifier is stale and ignored.
pub async fn resolve<S: KeyValueStore>(
    session: &SessionManager<S>,
    callback: &AuthCallback,
) -> Result<Entry> {
    if let Some(error) = &callback.error {
        return Ok(Entry::Denied(error.clone()));
    }

    let code = match &callback.code {
        Some(code) => Some(code.clone()),
        None => session.authorization_code().await?,
    };
    if let Some(code) = code {
        match session.code_verifier().await? {
            Some(verifier) => return Ok(Entry::ExchangeCode { code, verifier }),
            None => log::debug!("ignoring authorization code without stored verifier"),
        }
    }

    if let Some(context) = session.context().await? {
        if !context.is_expired(Utc::now()) {
            return Ok(Entry::Proceed(context));
        }
    }

    match session.refresh_token().await? {
        Some(refresh_token) => Ok(Entry::Refresh(refresh_token)),
        None => Ok(Entry::BeginPkce),
    }
}
