//! Downwatch HTTP facade — library interface.
//!
//! Re-exports the router builder and application state so integration
//! tests can construct the service in-process.

pub mod api;
pub mod config;

pub use api::{build_router, AppState};
