use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::types::AuthCallback;

/// Liveness of the callback server plus where the login currently stands.
///
/// `login` is `waiting` until the authorization page redirects back, then
/// `redirected` until the session flow picks the parameters up.
pub async fn health(
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthCallback>>>>,
) -> Json<Value> {
    let login = match shared_state.lock().await.as_ref() {
        None => "waiting",
        Some(_) => "redirected",
    };

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "status": "ok",
        "login": login,
        "callback_path": "/callback",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_login_progress() {
        let state = Arc::new(Mutex::new(None));

        let Json(body) = health(Extension(Arc::clone(&state))).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "wayfinder");
        assert_eq!(body["login"], "waiting");

        *state.lock().await = Some(AuthCallback {
            code: Some("code".to_string()),
            error: None,
        });
        let Json(body) = health(Extension(state)).await;
        assert_eq!(body["login"], "redirected");
    }
}
