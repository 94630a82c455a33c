use chrono::{DateTime, Utc};

/// Credentials of one top-level operation.
///
/// Read once from the session store when an operation starts and passed down
/// explicitly. Refreshing the stored token later does not change a context
/// that is already in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionContext {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Contexts without a known expiry never count as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
