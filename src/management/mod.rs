mod auth;
mod snapshot;
mod store;

pub use auth::{
    ACCESS_TOKEN_EXPIRES_AT_KEY, ACCESS_TOKEN_KEY, ACCESS_TOKEN_MARGIN_SECS,
    AUTHORIZATION_CODE_KEY, CODE_CHALLENGE_KEY, CODE_VERIFIER_KEY, REFRESH_TOKEN_KEY,
    SessionManager,
};
pub use snapshot::LibrarySnapshotManager;
pub use store::{FileStore, KeyValueStore, MemoryStore};
