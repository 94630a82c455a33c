//! Session glue around the aggregation engine.
//!
//! - [`context`] - the explicit credentials value every operation receives
//! - [`entry`] - branching on stored credentials and callback parameters
//! - [`auth`] - PKCE redirect, code exchange and refresh
//! - [`orchestrator`] - the five top-level queries and their enrichment

pub mod auth;
pub mod context;
pub mod entry;
pub mod orchestrator;

pub use auth::{authenticate, ensure_session, settle};
pub use context::SessionContext;
pub use entry::{Entry, resolve};
pub use orchestrator::{LoadReport, load_dataset, run};
