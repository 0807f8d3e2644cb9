//! Server configuration, state and lifecycle
//!
//! - [`Config`] - environment driven settings
//! - [`ServerState`] - shared services handed to every handler
//! - [`Server`] - HTTP listener with graceful shutdown
//! - [`ServerError`] - startup and runtime failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::{ResourceVersions, ServerState};
