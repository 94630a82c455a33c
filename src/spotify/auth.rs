//! Token endpoint calls of the authorization code flow with PKCE.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config,
    error::{ApiError, Result, WayfinderError},
    types::Token,
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope,
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Authorization page URL the user is sent to.
pub fn authorize_url(code_challenge: &str) -> Result<String> {
    let url = reqwest::Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", config::spotify_client_id()?),
            ("response_type", "code".to_string()),
            ("redirect_uri", config::spotify_redirect_uri()?),
            ("code_challenge", code_challenge.to_string()),
            ("code_challenge_method", "S256".to_string()),
            ("scope", config::spotify_scope()),
        ],
    )
    .map_err(|e| WayfinderError::Config(format!("invalid authorization URL: {e}")))?;
    Ok(url.into())
}

async fn post_token_form(form: &[(&str, &str)]) -> std::result::Result<TokenResponse, ApiError> {
    let response = Client::new()
        .post(config::spotify_apitoken_url())
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Exchanges an authorization code plus the stored verifier for a token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;

    let response = post_token_form(&[
        ("grant_type", "authorization_code"),
        ("client_id", &client_id),
        ("code", code),
        ("code_verifier", verifier),
        ("redirect_uri", &redirect_uri),
    ])
    .await?;

    Ok(response.into_token(None))
}

/// Refresh grant. The previous refresh token is kept when the response does
/// not rotate it.
pub async fn refresh_token(refresh_token: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;

    let response = post_token_form(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", &client_id),
    ])
    .await?;

    Ok(response.into_token(Some(refresh_token)))
}
