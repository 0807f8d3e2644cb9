//! Shared types for the dining service
//!
//! Wire and domain types used by the server and its clients: order commands,
//! events and snapshots, the status machine, roles, tables, bills and the
//! unified error/response shape.

pub mod error;
pub mod message;
pub mod models;
pub mod order;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::SyncPayload;
