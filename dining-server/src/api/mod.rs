//! HTTP API
//!
//! - [`health`] - liveness, no identity needed
//! - [`orders`] - order commands and queries
//! - [`tables`] - dining table registry
//! - [`bills`] - ledger and settlement
//! - [`deliveries`] - driver cash still outstanding
//! - [`events`] - server-sent refresh stream

pub mod bills;
pub mod deliveries;
pub mod events;
pub mod health;
pub mod orders;
pub mod tables;

pub use crate::utils::{AppError, AppResult};
