//! HTTP endpoints of the local callback server.
//!
//! - [`callback`] receives the redirect from the authorization page and hands
//!   `code` or `error` to the waiting login flow.
//! - [`health`] reports status, version and whether the redirect arrived.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
