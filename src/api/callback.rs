use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::types::AuthCallback;

/// Redirect target of the authorization page.
///
/// Only records `code` and `error`; exchanging the code happens in the
/// waiting session flow.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthCallback>>>>,
) -> Html<&'static str> {
    let callback = AuthCallback {
        code: params.get("code").cloned(),
        error: params.get("error").cloned(),
    };

    let page = match (&callback.code, &callback.error) {
        (_, Some(_)) => "<h4>Authorization was denied.</h4><p>You can close this window.</p>",
        (Some(_), None) => "<h2>Authentication successful.</h2><p>You can close this window.</p>",
        (None, None) => return Html("<h4>Missing authorization code.</h4>"),
    };

    *shared_state.lock().await = Some(callback);
    Html(page)
}
