use chrono::{DateTime, Duration, Utc};

use super::store::KeyValueStore;
use crate::{error::Result, pkce::PkcePair, session::SessionContext, types::Token};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const ACCESS_TOKEN_EXPIRES_AT_KEY: &str = "access_token_expires_at";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const CODE_VERIFIER_KEY: &str = "code_verifier";
pub const CODE_CHALLENGE_KEY: &str = "code_challenge";
pub const AUTHORIZATION_CODE_KEY: &str = "authorization_code";

/// Keys that only live between the authorization redirect and the exchange.
const TRANSIENT_KEYS: [&str; 3] = [
    CODE_VERIFIER_KEY,
    CODE_CHALLENGE_KEY,
    AUTHORIZATION_CODE_KEY,
];

/// The access token is dropped this many seconds before the remote expiry.
pub const ACCESS_TOKEN_MARGIN_SECS: i64 = 10;

/// Credential lifecycle on top of a [`KeyValueStore`].
pub struct SessionManager<S> {
    store: S,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stores a fresh verifier/challenge pair for the redirect and forgets
    /// any code issued for the previous one.
    pub async fn begin_pkce(&self, pair: &PkcePair) -> Result<()> {
        self.store.remove(AUTHORIZATION_CODE_KEY).await?;
        self.store
            .set(CODE_VERIFIER_KEY, &pair.verifier, None)
            .await?;
        self.store
            .set(CODE_CHALLENGE_KEY, &pair.challenge, None)
            .await
    }

    pub async fn code_verifier(&self) -> Result<Option<String>> {
        self.store.get(CODE_VERIFIER_KEY).await
    }

    /// Stored until `save_token` or a new `begin_pkce` drops it.
    pub async fn record_authorization_code(&self, code: &str) -> Result<()> {
        self.store.set(AUTHORIZATION_CODE_KEY, code, None).await
    }

    pub async fn authorization_code(&self) -> Result<Option<String>> {
        self.store.get(AUTHORIZATION_CODE_KEY).await
    }

    pub async fn access_token(&self) -> Result<Option<String>> {
        self.store.get(ACCESS_TOKEN_KEY).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(REFRESH_TOKEN_KEY)
            .await?
            .filter(|token| !token.is_empty()))
    }

    /// Persists a token and drops the PKCE leftovers.
    ///
    /// The access token expires `expires_in - 10` seconds after it was
    /// obtained; the refresh token does not expire locally.
    pub async fn save_token(&self, token: &Token) -> Result<SessionContext> {
        let expires_at = access_expiry(token);
        self.store
            .set(ACCESS_TOKEN_KEY, &token.access_token, Some(expires_at))
            .await?;
        self.store
            .set(
                ACCESS_TOKEN_EXPIRES_AT_KEY,
                &expires_at.to_rfc3339(),
                Some(expires_at),
            )
            .await?;
        if !token.refresh_token.is_empty() {
            self.store
                .set(REFRESH_TOKEN_KEY, &token.refresh_token, None)
                .await?;
        }
        for key in TRANSIENT_KEYS {
            self.store.remove(key).await?;
        }

        Ok(SessionContext {
            access_token: token.access_token.clone(),
            refresh_token: Some(token.refresh_token.clone()).filter(|t| !t.is_empty()),
            expires_at: Some(expires_at),
        })
    }

    /// Snapshot of the stored credentials, `None` without a live access token.
    pub async fn context(&self) -> Result<Option<SessionContext>> {
        let Some(access_token) = self.access_token().await? else {
            return Ok(None);
        };
        let expires_at = self
            .store
            .get(ACCESS_TOKEN_EXPIRES_AT_KEY)
            .await?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|at| at.with_timezone(&Utc));
        Ok(Some(SessionContext {
            access_token,
            refresh_token: self.refresh_token().await?,
            expires_at,
        }))
    }

    /// Removes every session key.
    pub async fn clear(&self) -> Result<()> {
        for key in [
            ACCESS_TOKEN_KEY,
            ACCESS_TOKEN_EXPIRES_AT_KEY,
            REFRESH_TOKEN_KEY,
        ]
            .into_iter()
            .chain(TRANSIENT_KEYS)
        {
            self.store.remove(key).await?;
        }
        Ok(())
    }
}

fn access_expiry(token: &Token) -> DateTime<Utc> {
    let obtained = DateTime::from_timestamp(token.obtained_at as i64, 0).unwrap_or_else(Utc::now);
    obtained + Duration::seconds(token.expires_in as i64 - ACCESS_TOKEN_MARGIN_SECS)
}
