use crate::{
    aggregate::RetryExecutor,
    config::{self, EngineConfig},
    error,
    management::{FileStore, SessionManager},
    session,
    spotify::{SpotifyApi, SpotifyClient},
    success,
};

/// Prints the profile of the authenticated user.
pub async fn profile() {
    let store = SessionManager::new(FileStore::default());
    let context = match session::ensure_session(&store).await {
        Ok(context) => context,
        Err(e) => error!("{}", e),
    };

    let config = EngineConfig::from_env().unwrap_or_default();
    let api = SpotifyClient::new(&config::spotify_apiurl(), &context);
    let retry = RetryExecutor::new(config.retry);

    let profile = match retry.execute("profile", || api.profile()).await {
        Ok(profile) => profile,
        Err(e) => error!("Failed to fetch profile: {}", e),
    };

    success!(
        "{} ({})",
        profile.display_name.as_deref().unwrap_or(&profile.id),
        profile.uri
    );
    println!("  country:   {}", profile.country.as_deref().unwrap_or("-"));
    println!("  product:   {}", profile.product.as_deref().unwrap_or("-"));
    println!("  followers: {}", profile.followers.total);
}
