//! Wayfinder Listening History Aggregator
//!
//! This library authenticates against the Spotify Web API with OAuth 2.0 PKCE
//! and assembles a user's listening history (saved tracks, top artists and
//! tracks, recently played, audio features and genres) into one denormalized
//! dataset for visualization.
//!
//! # Modules
//!
//! - `aggregate` - Retry-aware batched aggregation engine
//! - `api` - HTTP API endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy
//! - `management` - Session storage and library snapshots
//! - `pkce` - PKCE verifier and challenge generation
//! - `server` - Local HTTP server for OAuth callbacks
//! - `session` - Session context, entry conditions and load orchestration
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use wayfinder::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> wayfinder::Result<()> {
//!     config::load_env().await?;
//!     cli::load(None, false).await;
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pkce;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{ApiError, Result, WayfinderError};

/// Prints a status line prefixed with a blue `o`.
///
/// Takes the same arguments as `println!`.
///
/// ```
/// info!("Opening the authorization page...");
/// info!("Snapshot holds {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completion line prefixed with a green checkmark.
///
/// ```
/// success!("Loaded {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and terminates with exit code 1.
///
/// This is the visible error state of a failed load: every fatal failure of a
/// command ends here, with the cause in the message. Nothing after the macro
/// runs.
///
/// ```
/// error!("Failed to load listening history: {}", err);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for problems that do not stop the command.
///
/// ```
/// warning!("{} pages could not be fetched", failed);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
