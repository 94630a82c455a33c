use crate::{
    error,
    management::{FileStore, SessionManager},
    session, success,
};

/// Runs the browser login and stores the resulting token.
pub async fn auth() {
    let session = SessionManager::new(FileStore::default());
    match session::authenticate(&session).await {
        Ok(_) => success!("Authentication successful!"),
        Err(e) => error!("Authentication failed: {}", e),
    }
}

/// Removes every stored credential.
pub async fn logout() {
    let session = SessionManager::new(FileStore::default());
    if let Err(e) = session.clear().await {
        error!("Failed to clear session: {}", e);
    }
    success!("Logged out.");
}
