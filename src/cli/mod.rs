//! # CLI Module
//!
//! User-facing commands. Each command resolves its own session, reports
//! progress with spinners and the colored status macros, and ends in a
//! visible error (exit code 1) when something fatal happens.
//!
//! ## Commands
//!
//! - [`auth`] - browser login with PKCE
//! - [`logout`] - removes stored credentials
//! - [`load`] - aggregates the listening history, stores the library
//!   snapshot and optionally exports the full dataset as JSON
//! - [`library`] - lists the snapshot offline with search and limit
//! - [`profile`] - shows the current user
//!
//! ## Usage
//!
//! ```bash
//! wayfinder auth
//! wayfinder load --output history.json
//! wayfinder library --search shoegaze --limit 20
//! ```

mod auth;
mod library;
mod load;
mod profile;

pub use auth::{auth, logout};
pub use library::library;
pub use load::load;
pub use profile::profile;
