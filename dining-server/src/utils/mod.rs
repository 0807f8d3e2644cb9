//! Utilities
//!
//! - [`AppError`] / [`ApiResponse`] (from `shared::error`)
//! - logging setup
//! - request validation and blocking-call helpers

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use validation::{run_blocking, validate_request};
