//! Request validation and blocking-call helpers for handlers

use validator::Validate;

use crate::utils::{AppError, AppResult};

/// Entity names: tables, drivers, operators
pub const MAX_NAME_LEN: u64 = 200;

/// Notes and reasons
pub const MAX_NOTE_LEN: u64 = 500;

/// Client supplied ids (command ids)
pub const MAX_ID_LEN: u64 = 64;

/// Run `validator` rules, reporting each failing field in the error details
pub fn validate_request<T: Validate>(request: &T) -> AppResult<()> {
    request.validate().map_err(|errors| {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        AppError::validation(format!("Invalid request: {}", errors))
            .with_detail("fields", fields)
    })
}

/// Run a redb transaction off the async executor
pub async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::internal(format!("Blocking task failed: {}", e)))?
}
